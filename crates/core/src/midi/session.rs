//! Process-wide MIDI device session.
//!
//! Owns the midir client for the lifetime of the application. Input
//! callbacks run on the OS MIDI thread and only forward raw bytes into a
//! channel; all decoding and state mutation happen on the bridge's event
//! loop, so messages are observed strictly in arrival order.

use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from opening the MIDI subsystem or claiming a port.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The host has no usable MIDI subsystem.
    #[error("MIDI is not supported on this host: {0}")]
    Unsupported(String),

    /// The OS refused the access grant or the port connection.
    #[error("MIDI access denied: {0}")]
    Denied(String),
}

/// Errors from transmitting an outbound message.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("no MIDI output device connected")]
    NoOutputDevice,

    #[error("failed to send MIDI message: {0}")]
    Failed(String),
}

/// A connected MIDI endpoint, as enumerated at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub index: usize,
    pub name: String,
}

/// Lifecycle owner for MIDI device access.
///
/// One input subscription and one output connection at a time. Hot-plug is
/// not handled: a disconnected input simply stops producing callbacks and
/// sends to a disconnected output fail.
pub struct MidiSession {
    input: Option<MidiInput>,
    output: Option<MidiOutput>,
    input_connection: Option<MidiInputConnection<mpsc::UnboundedSender<Vec<u8>>>>,
    output_connection: Option<MidiOutputConnection>,
}

impl MidiSession {
    /// Request access to the host MIDI subsystem.
    ///
    /// Must complete before any inputs or outputs are usable. The caller
    /// awaits this without blocking other work.
    pub async fn open(client_name: &str) -> Result<Self, AccessError> {
        let input = MidiInput::new(&format!("{}-in", client_name))
            .map_err(|e| AccessError::Unsupported(e.to_string()))?;
        let output = MidiOutput::new(&format!("{}-out", client_name))
            .map_err(|e| AccessError::Unsupported(e.to_string()))?;

        log::info!("MIDI access granted for client '{}'", client_name);

        Ok(Self {
            input: Some(input),
            output: Some(output),
            input_connection: None,
            output_connection: None,
        })
    }

    /// Enumerate input endpoints. Empty once an input is subscribed.
    pub fn list_inputs(&self) -> Vec<DeviceDescriptor> {
        match &self.input {
            Some(input) => input
                .ports()
                .iter()
                .enumerate()
                .map(|(index, port)| DeviceDescriptor {
                    index,
                    name: input
                        .port_name(port)
                        .unwrap_or_else(|_| format!("input-{}", index)),
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Enumerate output endpoints. Empty once an output is connected.
    pub fn list_outputs(&self) -> Vec<DeviceDescriptor> {
        match &self.output {
            Some(output) => output
                .ports()
                .iter()
                .enumerate()
                .map(|(index, port)| DeviceDescriptor {
                    index,
                    name: output
                        .port_name(port)
                        .unwrap_or_else(|_| format!("output-{}", index)),
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// First endpoint whose name contains `filter`, or the first endpoint
    /// when no filter is given.
    pub fn find_input(&self, filter: Option<&str>) -> Option<DeviceDescriptor> {
        Self::find_port(self.list_inputs(), filter)
    }

    pub fn find_output(&self, filter: Option<&str>) -> Option<DeviceDescriptor> {
        Self::find_port(self.list_outputs(), filter)
    }

    fn find_port(
        ports: Vec<DeviceDescriptor>,
        filter: Option<&str>,
    ) -> Option<DeviceDescriptor> {
        match filter {
            Some(name) => ports.into_iter().find(|p| p.name.contains(name)),
            None => ports.into_iter().next(),
        }
    }

    /// Subscribe to an input endpoint.
    ///
    /// Each inbound message is forwarded raw, in arrival order, into `tx`.
    /// The callback never blocks; decoding happens on the receiving side.
    pub fn subscribe(
        &mut self,
        input: &DeviceDescriptor,
        tx: mpsc::UnboundedSender<Vec<u8>>,
    ) -> Result<(), AccessError> {
        let midi_in = self
            .input
            .take()
            .ok_or_else(|| AccessError::Denied("input already subscribed".to_string()))?;

        let ports = midi_in.ports();
        let port = match ports.get(input.index) {
            Some(port) => port.clone(),
            None => {
                self.input = Some(midi_in);
                return Err(AccessError::Denied(format!(
                    "input '{}' is no longer present",
                    input.name
                )));
            }
        };

        match midi_in.connect(
            &port,
            "chroma-input",
            move |_timestamp, message, tx| {
                let _ = tx.send(message.to_vec());
            },
            tx,
        ) {
            Ok(connection) => {
                self.input_connection = Some(connection);
                log::info!("MIDI input '{}' connected", input.name);
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.input = Some(e.into_inner());
                Err(AccessError::Denied(reason))
            }
        }
    }

    /// Connect an output endpoint for subsequent sends.
    pub fn connect_output(&mut self, output: &DeviceDescriptor) -> Result<(), AccessError> {
        let midi_out = self
            .output
            .take()
            .ok_or_else(|| AccessError::Denied("output already connected".to_string()))?;

        let ports = midi_out.ports();
        let port = match ports.get(output.index) {
            Some(port) => port.clone(),
            None => {
                self.output = Some(midi_out);
                return Err(AccessError::Denied(format!(
                    "output '{}' is no longer present",
                    output.name
                )));
            }
        };

        match midi_out.connect(&port, "chroma-output") {
            Ok(connection) => {
                self.output_connection = Some(connection);
                log::info!("MIDI output '{}' connected", output.name);
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                self.output = Some(e.into_inner());
                Err(AccessError::Denied(reason))
            }
        }
    }

    pub fn has_output(&self) -> bool {
        self.output_connection.is_some()
    }

    /// Transmit one raw message on the connected output.
    pub fn send(&mut self, message: &[u8]) -> Result<(), SendError> {
        match &mut self.output_connection {
            Some(connection) => connection
                .send(message)
                .map_err(|e| SendError::Failed(e.to_string())),
            None => Err(SendError::NoOutputDevice),
        }
    }

    /// Drop connections to properly close MIDI ports.
    pub fn close(&mut self) {
        self.input_connection = None;
        self.output_connection = None;
        log::info!("MIDI session closed");
    }
}
