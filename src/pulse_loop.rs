// pulse_loop.rs

use crate::midi::{MidiMessage, PulseSource};
use crate::smoother::{Clock, NotifyOutcome, PulseVelocityEstimator};
use crossbeam::channel::{unbounded, Receiver};
use log::{debug, error, info};
use std::thread::{self, JoinHandle};

/// Which bytes of an incoming message reach the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    /// The last byte of every channel message
    DataByte,
    /// Only the value of control changes on this controller number
    Controller(u8),
    /// Every byte of every channel message, status included
    RawBytes,
}

impl ForwardMode {
    pub fn pulse_bytes(self, data: &[u8], msg: &MidiMessage) -> Vec<u8> {
        match self {
            ForwardMode::DataByte => msg.pulse_byte(None).into_iter().collect(),
            ForwardMode::Controller(number) => msg.pulse_byte(Some(number)).into_iter().collect(),
            ForwardMode::RawBytes => match msg {
                MidiMessage::ControlChange { .. } | MidiMessage::Channel { .. } => data.to_vec(),
                _ => Vec::new(),
            },
        }
    }
}

/// Owns the estimator on the transport thread and feeds it incoming messages
pub struct PulseLoop<C: Clock> {
    estimator: PulseVelocityEstimator<C>,
    rx: Receiver<Vec<u8>>,
    mode: ForwardMode,
}

impl<C: Clock> PulseLoop<C> {
    pub fn new(
        estimator: PulseVelocityEstimator<C>,
        rx: Receiver<Vec<u8>>,
        mode: ForwardMode,
    ) -> Self {
        PulseLoop { estimator, rx, mode }
    }

    pub fn estimator(&self) -> &PulseVelocityEstimator<C> {
        &self.estimator
    }

    /// Handles one raw message and returns what each forwarded byte did.
    ///
    /// Start/Continue activate the session and Stop deactivates it. Pulse
    /// bytes arriving while the session is stopped are dropped here, since
    /// the estimator itself does not check.
    pub fn handle_message(&mut self, data: &[u8]) -> Vec<NotifyOutcome> {
        let msg = match MidiMessage::parse(data) {
            Some(msg) => msg,
            None => {
                debug!("Ignoring unparseable message {:02X?}", data);
                return Vec::new();
            }
        };

        match msg {
            MidiMessage::Start | MidiMessage::Continue => {
                self.estimator.activate();
                return Vec::new();
            }
            MidiMessage::Stop => {
                self.estimator.deactivate();
                return Vec::new();
            }
            _ => {}
        }

        if !self.estimator.is_active() {
            return Vec::new();
        }

        self.mode
            .pulse_bytes(data, &msg)
            .into_iter()
            .map(|byte| {
                let outcome = self.estimator.notify(byte);
                debug!("Pulse {:#04X}: {:?}", byte, outcome);
                outcome
            })
            .collect()
    }

    /// Runs until the message channel closes, then stops the session and
    /// hands the estimator back.
    pub fn run(mut self) -> PulseVelocityEstimator<C> {
        info!("Pulse loop running in {:?} mode", self.mode);
        loop {
            match self.rx.recv() {
                Ok(data) => {
                    self.handle_message(&data);
                }
                Err(e) => {
                    info!("Pulse channel closed: {}", e);
                    break;
                }
            }
        }

        self.estimator.deactivate();
        info!("Pulse loop stopped");
        self.estimator
    }
}

/// Pumps messages out of `source` into a channel on a dedicated thread.
///
/// The thread exits when the source errors or the receiver is dropped.
pub fn spawn_source_reader<S>(mut source: S) -> (Receiver<Vec<u8>>, JoinHandle<()>)
where
    S: PulseSource + 'static,
{
    let (tx, rx) = unbounded();
    let handle = thread::spawn(move || loop {
        match source.recv() {
            Ok(data) => {
                if tx.send(data).is_err() {
                    error!("Failed to forward MIDI message - receiver dropped");
                    break;
                }
            }
            Err(e) => {
                info!("MIDI source finished: {}", e);
                break;
            }
        }
    });
    (rx, handle)
}

/// Starts the reader thread and a pulse loop thread for `source`
pub fn run_pulse_loop<S, C>(
    source: S,
    estimator: PulseVelocityEstimator<C>,
    mode: ForwardMode,
) -> JoinHandle<PulseVelocityEstimator<C>>
where
    S: PulseSource + 'static,
    C: Clock + 'static,
{
    let (rx, _reader) = spawn_source_reader(source);
    let pulse_loop = PulseLoop::new(estimator, rx, mode);
    thread::spawn(move || pulse_loop.run())
}
