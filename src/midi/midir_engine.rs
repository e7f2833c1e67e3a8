use crate::midi::{MidiError, PulseSource, Result};
use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError};
use log::{debug, info, warn};
use midir::{Ignore, MidiInput, MidiInputConnection};
use std::time::Duration;

/// How long `recv` waits before checking the port is still there
const PORT_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Reads pulses from a real MIDI input port
pub struct MidirPulseSource {
    // Dropping the connection closes the port.
    _input: MidiInputConnection<()>,
    rx: Receiver<Vec<u8>>,
    device_name: String,
}

impl MidirPulseSource {
    pub fn new(device_name: &str) -> Result<Self> {
        let mut midi_in = MidiInput::new("platterrs-in")?;
        // Jog wheels interleave clock and active sensing; keep everything and filter later.
        midi_in.ignore(Ignore::None);

        let in_ports = midi_in.ports();
        let in_port = in_ports
            .iter()
            .find(|p| {
                let port_name = midi_in.port_name(p).unwrap_or_default();
                debug!("Checking port: {}", port_name);
                port_name.contains(device_name)
            })
            .ok_or_else(|| MidiError::DeviceNotFound(device_name.to_string()))?
            .clone();

        let (tx, rx) = unbounded();
        let input = midi_in.connect(
            &in_port,
            "platterrs-input",
            move |stamp, message, _| {
                debug!("Received {:02X?} at {} µs", message, stamp);
                let _ = tx.send(message.to_vec());
            },
            (),
        )?;

        info!("Connected to MIDI input: {}", device_name);
        Ok(MidirPulseSource {
            _input: input,
            rx,
            device_name: device_name.to_string(),
        })
    }
}

impl PulseSource for MidirPulseSource {
    /// Blocks for the next message. The callback's sender lives inside the
    /// connection, so an unplugged device never closes the channel; silence
    /// is followed by a port listing check instead.
    fn recv(&mut self) -> Result<Vec<u8>> {
        loop {
            match self.rx.recv_timeout(PORT_CHECK_INTERVAL) {
                Ok(message) => return Ok(message),
                Err(RecvTimeoutError::Timeout) => {
                    if !port_listed(&self.device_name, &list_input_ports()) {
                        warn!("MIDI input '{}' is no longer listed", self.device_name);
                        return Err(MidiError::Disconnected);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return Err(MidiError::Disconnected),
            }
        }
    }

    fn list_devices(&self) -> Vec<String> {
        list_input_ports()
    }
}

/// Names of every MIDI input port currently visible
pub fn list_input_ports() -> Vec<String> {
    let mut devices = Vec::new();

    if let Ok(midi_in) = MidiInput::new("platterrs-list") {
        for port in midi_in.ports() {
            if let Ok(name) = midi_in.port_name(&port) {
                devices.push(name);
            }
        }
    }

    devices
}

fn port_listed(device_name: &str, ports: &[String]) -> bool {
    ports.iter().any(|port| port.contains(device_name))
}
