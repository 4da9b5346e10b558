// SPDX-License-Identifier: MPL-2.0

//! Control program: read a device snapshot, then toggle or set the relay.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example control -- <host> <device_id> [on|off|toggle]
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example control -- 192.168.1.60 100090ab1a toggle
//! ```

use std::env;

use sonoff_diy::{Device, SwitchState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: {} <host> <device_id> [on|off|toggle]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example control -- 192.168.1.60 100090ab1a toggle");
        std::process::exit(1);
    }

    let host = &args[1];
    let device_id = &args[2];
    let action = args.get(3).map_or("status", String::as_str);

    println!("Connecting to {host}...");

    let (device, snapshot) = Device::http(host)
        .with_device_id(device_id)
        .build()
        .await?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!("Signal: {}", snapshot.signal_strength());

    let target = match action {
        "status" => None,
        "toggle" => Some(SwitchState::from(!snapshot.is_on())),
        other => Some(other.parse::<SwitchState>()?),
    };

    if let Some(state) = target {
        println!("Switching {state}...");
        device.set_switch(state).await?;

        let snapshot = device.fetch_snapshot().await?;
        println!("Relay is now {}", snapshot.switch_state());
    }

    device.close();
    Ok(())
}
