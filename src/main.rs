//! Character Creator - headless driver
//!
//! Builds a character from configuration and runs its tick loop, feeding
//! scripted pointer input and startup commands.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use character_creator::{
    config::Config, customize::CustomizationCommand, rotation::PointerFrame, script::InputScript,
    AppState,
};

/// Character Creator - interactive character customization, headless
#[derive(Parser, Debug)]
#[command(name = "character-creator", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pointer input script (TOML)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Ticks per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Stop after this many seconds (runs until Ctrl+C when omitted)
    #[arg(short, long)]
    duration: Option<f32>,

    /// Customization command to apply at startup (outfit, beard, armor,
    /// hair, optionally suffixed -next/-prev); may be repeated
    #[arg(long = "command", value_name = "CMD")]
    commands: Vec<CustomizationCommand>,

    /// Disable auto rotation (overrides config)
    #[arg(long)]
    no_auto_rotate: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", character_creator::NAME, character_creator::VERSION);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(args))?;

    info!("Character Creator stopped");
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    if args.no_auto_rotate {
        config.rotation.auto_enabled = false;
    }
    if args.fps == 0 {
        anyhow::bail!("--fps must be greater than 0");
    }

    let script = match args.script {
        Some(ref path) => InputScript::from_file(path)?,
        None => InputScript::default(),
    };
    info!("Scripted pointer events: {}", script.events().len());

    let state = AppState::new(config)?;
    info!("Outfits: {}", state.config.outfits.len());
    info!("Attachment slots: {}", state.config.attachments.len());
    info!("Auto rotation: {}", state.config.rotation.auto_enabled);

    for command in &args.commands {
        info!("Applying startup command: {:?}", command);
        state.apply(*command).await;
    }
    info!("Look: {:?}", state.snapshot().await);

    let signal_state = Arc::clone(&state);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received");
        signal_state.shutdown();
    });

    run_tick_loop(&state, &script, args.fps, args.duration).await;

    info!("Final look: {:?}", state.snapshot().await);
    Ok(())
}

/// Tick the character at a fixed rate until the duration elapses or shutdown
/// is signalled.
async fn run_tick_loop(state: &AppState, script: &InputScript, fps: u32, duration: Option<f32>) {
    let mut shutdown_rx = state.subscribe_shutdown();
    let dt = 1.0 / fps as f32;
    let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut player = script.player();
    let mut elapsed = 0.0f32;
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let frame: PointerFrame = player.frame_at(elapsed);
                state.tick(dt, &frame).await;
                elapsed += dt;
                ticks += 1;

                if ticks % fps as u64 == 0 {
                    let snapshot = state.snapshot().await;
                    info!(
                        "t={:.1}s yaw={:.1} dragging={}",
                        elapsed, snapshot.yaw, snapshot.dragging
                    );
                }

                if duration.is_some_and(|limit| elapsed >= limit) {
                    info!("Duration reached after {} ticks", ticks);
                    break;
                }
            }
            _ = shutdown_rx.recv() => {
                warn!("Tick loop interrupted after {} ticks", ticks);
                break;
            }
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
