use std::path::PathBuf;

use chroma_core::{BridgeCommand, BridgeEvent, ColorBridge, ConfigManager};
use clap::Parser;
use tokio::sync::mpsc;

/// Convert colors to MIDI and vice-versa. Create, save, and send presets.
#[derive(Parser, Debug)]
#[command(name = "chroma")]
#[command(about = "Color to MIDI preset bridge")]
struct Args {
    /// Image file to sample for the preset color
    #[arg(long)]
    image: Option<PathBuf>,

    /// MIDI device name filter (overrides the configured device)
    #[arg(long)]
    device: Option<String>,

    /// Send the preset to the first matching MIDI output
    #[arg(short, long)]
    send: bool,

    /// Export a PNG swatch of the preset into the given directory
    #[arg(long)]
    save_preset: Option<PathBuf>,

    /// Keep running and apply incoming control changes to the color
    #[arg(short, long)]
    listen: bool,

    /// Configuration file path (default: config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config_manager = ConfigManager::new(args.config.clone());
    let mut settings = config_manager
        .load()
        .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;

    // CLI flags take precedence over the config file
    if let Some(device) = &args.device {
        settings.midi_enabled = true;
        settings.midi_device = device.clone();
    }
    if args.send || args.listen {
        settings.midi_enabled = true;
    }

    if let Err(errors) = ConfigManager::validate_settings(&settings) {
        anyhow::bail!("invalid settings: {}", errors.join(", "));
    }

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut bridge = ColorBridge::new(settings);
    let bridge_handle =
        tokio::spawn(async move { bridge.run_with_channels(command_rx, event_tx).await });

    if let Some(path) = args.image {
        command_tx.send(BridgeCommand::LoadImage { path })?;
    }
    if let Some(dir) = args.save_preset {
        command_tx.send(BridgeCommand::SavePreset { dir: Some(dir) })?;
    }
    if args.send {
        command_tx.send(BridgeCommand::SendPreset)?;
    }
    if !args.listen {
        command_tx.send(BridgeCommand::Shutdown)?;
    }

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(BridgeEvent::ColorChanged { color, triple }) => {
                        println!("Color: {} {}  MIDI: {}", color, color.hex(), triple);
                    }
                    Some(BridgeEvent::PresetSent { triple }) => {
                        println!("Preset sent to device: {}", triple);
                    }
                    Some(BridgeEvent::PresetSaved { path }) => {
                        println!("Preset saved: {}", path.display());
                    }
                    Some(BridgeEvent::Error { message }) => {
                        eprintln!("Error: {}", message);
                    }
                    Some(BridgeEvent::Initialized) | Some(BridgeEvent::MidiMessageReceived { .. }) => {}
                    Some(BridgeEvent::ShutdownComplete) | None => break,
                }
            }

            _ = tokio::signal::ctrl_c(), if args.listen => {
                log::info!("Interrupt received, shutting down");
                let _ = command_tx.send(BridgeCommand::Shutdown);
            }
        }
    }

    bridge_handle.await??;
    Ok(())
}
