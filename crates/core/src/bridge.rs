use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::color::Color;
use crate::messages::{BridgeCommand, BridgeEvent, Settings};
use crate::midi::session::{AccessError, SendError};
use crate::midi::{ControlMapping, MidiMessage, MidiSession, MidiTriple};
use crate::{preset, sampler};

/// The bridge between the color state and the MIDI device.
///
/// Owns the single mutable [`Color`] value. All mutation happens on the
/// run loop (wholesale replacement from image sampling, single-component
/// replacement from inbound control changes), so no locking is needed.
pub struct ColorBridge {
    color: Color,
    settings: Settings,

    // MIDI device session
    session: Option<MidiSession>,
    midi_rx: Option<mpsc::UnboundedReceiver<Vec<u8>>>,

    // System state
    is_running: bool,
}

impl ColorBridge {
    pub fn new(settings: Settings) -> Self {
        Self {
            color: Color::default(),
            settings,
            session: None,
            midi_rx: None,
            is_running: false,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn midi_triple(&self) -> MidiTriple {
        MidiTriple::from_color(&self.color)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Feed the bridge from an external raw-byte source instead of a
    /// device subscription. Messages are processed in arrival order,
    /// exactly as hardware input would be.
    pub fn attach_input_channel(&mut self, rx: mpsc::UnboundedReceiver<Vec<u8>>) {
        self.midi_rx = Some(rx);
    }

    /// Main loop. Processes commands and inbound MIDI until `Shutdown`.
    ///
    /// MIDI access is requested up front when enabled; failure is surfaced
    /// as an event and the bridge keeps running without hardware.
    pub async fn run_with_channels(
        &mut self,
        mut command_rx: mpsc::UnboundedReceiver<BridgeCommand>,
        event_tx: mpsc::UnboundedSender<BridgeEvent>,
    ) -> Result<(), anyhow::Error> {
        log::info!("Color bridge starting");

        if self.settings.midi_enabled && self.settings.midi_device != "None" {
            if let Err(e) = self.connect_midi().await {
                log::error!("MIDI unavailable: {}", e);
                let _ = event_tx.send(BridgeEvent::Error {
                    message: e.to_string(),
                });
            }
        }

        self.is_running = true;
        let _ = event_tx.send(BridgeEvent::Initialized);
        self.emit_color(&event_tx);

        // Take ownership of the MIDI receiver for the loop
        let mut midi_rx = self.midi_rx.take();

        loop {
            tokio::select! {
                // Handle caller commands
                Some(command) = command_rx.recv() => {
                    let shutdown = matches!(command, BridgeCommand::Shutdown);
                    self.process_command(command, &event_tx);
                    if shutdown {
                        break;
                    }
                }

                // Handle MIDI input (if subscribed)
                Some(raw) = async {
                    if let Some(rx) = midi_rx.as_mut() {
                        rx.recv().await
                    } else {
                        std::future::pending().await
                    }
                } => {
                    self.handle_midi_input(&raw, &event_tx);
                }

                else => break,
            }
        }

        if let Some(session) = self.session.as_mut() {
            session.close();
        }
        self.is_running = false;
        let _ = event_tx.send(BridgeEvent::ShutdownComplete);
        log::info!("Color bridge run loop completed");
        Ok(())
    }

    async fn connect_midi(&mut self) -> Result<(), AccessError> {
        let mut session = MidiSession::open("chroma").await?;

        match session.find_input(self.device_filter()) {
            Some(input) => {
                let (tx, rx) = mpsc::unbounded_channel();
                session.subscribe(&input, tx)?;
                self.midi_rx = Some(rx);
            }
            None => {
                log::warn!("No MIDI input devices found; inbound control disabled");
            }
        }

        self.session = Some(session);
        Ok(())
    }

    fn device_filter(&self) -> Option<&str> {
        match self.settings.midi_device.as_str() {
            "None" | "" => None,
            name => Some(name),
        }
    }

    fn process_command(
        &mut self,
        command: BridgeCommand,
        event_tx: &mpsc::UnboundedSender<BridgeEvent>,
    ) {
        use BridgeCommand::*;

        match command {
            LoadImage { path } => match sampler::sample_file(&path) {
                Ok(color) => {
                    self.color = color;
                    log::info!("Sampled {:?} to {}", path, color);
                    self.emit_color(event_tx);
                }
                Err(e) => {
                    // Aborts only this update; the last good color stands.
                    log::error!("Image sampling failed: {}", e);
                    let _ = event_tx.send(BridgeEvent::Error {
                        message: e.to_string(),
                    });
                }
            },

            SetColor { color } => {
                self.color = color;
                self.emit_color(event_tx);
            }

            SetComponent { component, value } => {
                self.color.set(component, value);
                self.emit_color(event_tx);
            }

            SendPreset => match self.send_preset() {
                Ok(triple) => {
                    log::info!("Preset sent: {}", triple);
                    let _ = event_tx.send(BridgeEvent::PresetSent { triple });
                }
                Err(e) => {
                    log::error!("Preset send failed: {}", e);
                    let _ = event_tx.send(BridgeEvent::Error {
                        message: e.to_string(),
                    });
                }
            },

            SavePreset { dir } => {
                let dir = dir.unwrap_or_else(|| PathBuf::from(&self.settings.preset_dir));
                match preset::save_preset(&self.color, &dir, self.settings.swatch_size) {
                    Ok(path) => {
                        let _ = event_tx.send(BridgeEvent::PresetSaved { path });
                    }
                    Err(e) => {
                        log::error!("Preset export failed: {}", e);
                        let _ = event_tx.send(BridgeEvent::Error {
                            message: e.to_string(),
                        });
                    }
                }
            }

            Shutdown => {
                log::info!("Color bridge received shutdown");
            }
        }
    }

    /// Send the three control changes representing the current color.
    ///
    /// The messages go out independently; partial delivery can only affect
    /// the hardware receiver's state, never the local color.
    fn send_preset(&mut self) -> Result<MidiTriple, SendError> {
        let filter = match self.settings.midi_device.as_str() {
            "None" | "" => None,
            name => Some(name.to_string()),
        };

        let session = self.session.as_mut().ok_or(SendError::NoOutputDevice)?;

        if !session.has_output() {
            let output = session
                .find_output(filter.as_deref())
                .ok_or(SendError::NoOutputDevice)?;
            session
                .connect_output(&output)
                .map_err(|e| SendError::Failed(e.to_string()))?;
        }

        let messages = ControlMapping::color_to_messages(&self.color, self.settings.midi_channel);
        for message in &messages {
            session.send(message)?;
        }

        Ok(MidiTriple::from_color(&self.color))
    }

    fn handle_midi_input(
        &mut self,
        raw: &[u8],
        event_tx: &mpsc::UnboundedSender<BridgeEvent>,
    ) {
        let Some(message) = MidiMessage::decode(raw) else {
            log::debug!("Truncated MIDI message: {:?}", raw);
            return;
        };

        let _ = event_tx.send(BridgeEvent::MidiMessageReceived { message });

        match message {
            MidiMessage::ControlChange {
                controller, value, ..
            } => match ControlMapping::translate_cc(controller, value) {
                Some((component, channel_value)) => {
                    self.color.set(component, channel_value);
                    log::info!("MIDI CC {}: {:?} = {}", controller, component, channel_value);
                    self.emit_color(event_tx);
                }
                None => {
                    log::debug!("Ignoring unmapped controller {}", controller);
                }
            },
            MidiMessage::NoteOn { note, velocity, .. } => {
                log::debug!("MIDI Note On: {} velocity: {}", note, velocity);
            }
            MidiMessage::NoteOff { note, .. } => {
                log::debug!("MIDI Note Off: {}", note);
            }
            MidiMessage::Unknown(raw) => {
                log::debug!("MIDI Message: {:?}", raw);
            }
        }
    }

    fn emit_color(&self, event_tx: &mpsc::UnboundedSender<BridgeEvent>) {
        let _ = event_tx.send(BridgeEvent::ColorChanged {
            color: self.color,
            triple: MidiTriple::from_color(&self.color),
        });
    }
}
