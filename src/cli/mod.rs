use crate::config::Overrides;
use clap::Parser;
use dialoguer::Select;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn jog wheel pulses into playback speed", long_about = None)]
pub struct Args {
    /// List available MIDI input devices
    #[arg(long)]
    pub device_list: bool,

    /// Bind to a specific MIDI input device (substring match)
    #[arg(long)]
    pub bind_to_device: Option<String>,

    /// Settings file (defaults to ./platterrs.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Raw pulses per full platter revolution
    #[arg(long)]
    pub pulses_per_revolution: Option<u32>,

    /// Seconds of audio one revolution represents
    #[arg(long)]
    pub seconds_per_revolution: Option<f64>,

    /// Only use control changes on this controller number
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..128))]
    pub controller: Option<u8>,

    /// Forward every byte of each message instead of just the data byte
    #[arg(long, conflicts_with = "controller")]
    pub raw_bytes: bool,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            pulses_per_revolution: self.pulses_per_revolution,
            seconds_per_revolution: self.seconds_per_revolution,
            controller: self.controller,
            raw_bytes: self.raw_bytes,
        }
    }
}

pub fn validate_device(device_name: &str, devices: &[String]) -> Result<(), String> {
    if !devices.iter().any(|d| d.contains(device_name)) {
        let mut error_msg = format!(
            "Error: Device '{}' not found in available devices:\n",
            device_name
        );
        for device in devices {
            error_msg.push_str(&format!("  - {}\n", device));
        }
        return Err(error_msg);
    }
    Ok(())
}

/// Asks the user to pick an input port. `None` if there is nothing to pick
/// or the prompt was cancelled.
pub fn select_device(devices: &[String]) -> Option<String> {
    if devices.is_empty() {
        return None;
    }

    Select::new()
        .with_prompt("Select the jog wheel input")
        .items(devices)
        .default(0)
        .interact_opt()
        .ok()
        .flatten()
        .map(|index| devices[index].clone())
}
