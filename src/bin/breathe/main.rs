//! breathe - a short guided session on the default output device
//!
//! Run with: cargo run --bin breathe

use std::thread;
use std::time::Duration;

use color_eyre::eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use seadrift::ambient::AmbientTimbre;
use seadrift::cues::CueKind;
use seadrift::{AudioEngine, EngineConfig};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut engine = AudioEngine::connect(EngineConfig::default())
        .wrap_err("failed to connect to an audio output device")?;
    engine.resume().wrap_err("failed to start the audio stream")?;

    println!("=== breathe ===");
    println!("Four breaths, 4s in / 6s out, over an ocean bed. Then a chime.");
    println!();

    engine.set_ambient_enabled(true);
    engine.set_exhale_cue(CueKind::Bubbles);
    engine.start_breath_loop(4_000, 6_000);

    // Two breaths on the default bed, two on the darker one.
    thread::sleep(Duration::from_secs(20));
    engine.set_ambient_timbre(AmbientTimbre::Trench);
    thread::sleep(Duration::from_secs(20));

    engine.stop_breath_loop();
    engine.play_completion_chime();
    thread::sleep(Duration::from_secs(5));

    engine.set_ambient_enabled(false);
    // Let the bed's fade-out drain before tearing the stream down.
    thread::sleep(Duration::from_millis(400));
    engine.suspend().wrap_err("failed to pause the audio stream")?;

    Ok(())
}
