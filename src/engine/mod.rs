//! The audio engine: clock, scheduling, mixing, and the public facade.
/*
    Thread layout
    =============

      caller thread            control thread              audio thread
      -------------            --------------              ------------
      AudioEngine  --mpsc-->   Controller       --rtrb-->  Mixer
      (facade)                 BreathScheduler             voices
      resume/suspend           AmbientControl              AmbientBed
                               NodeTracker                 AudioClock++

    The facade never touches engine state directly: every mutation is a
    message to the control thread, which is the single place scheduling
    decisions happen. The control thread allocates voices and beds, then
    hands them through a lock-free ring to the mixer inside the cpal
    callback. The mixer is the only writer of the clock, and the clock
    only moves while the stream is playing, so "time" and "audible" can
    never disagree.
*/

/// The shared sample-counter clock.
pub mod clock;
/// Control-thread loop and command handling.
pub mod control;
/// Audio-thread voice and bed mixing.
pub mod mixer;
/// Device probing and the cpal stream.
pub mod output;
/// Lookahead breath-cue scheduling.
pub mod scheduler;
/// Transient-voice lifecycle bookkeeping.
pub mod tracker;

pub use clock::AudioClock;
pub use control::{Controller, EngineCommand};
pub use mixer::{Mixer, MixerCommand};
pub use output::{OutputDevice, OutputStream};
pub use scheduler::{
    BreathPhase, BreathScheduler, CueEvent, LOOKAHEAD_SECS, START_GUARD_SECS, TICK_INTERVAL,
};
pub use tracker::{NodeId, NodeTracker};

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ambient::AmbientTimbre;
use crate::cues::CueKind;
use crate::error::AudioError;

/// Construction-time settings for [`AudioEngine::connect`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Capacity of the control-to-mixer command ring.
    pub ring_capacity: usize,
    /// Soundscape selected before any `set_ambient_timbre` call.
    pub ambient_timbre: AmbientTimbre,
    /// Exhale cue selected before any `set_exhale_cue` call.
    pub exhale_cue: CueKind,
    /// Fixed seed for the cue/bed RNG; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ring_capacity: 256,
            ambient_timbre: AmbientTimbre::default(),
            exhale_cue: CueKind::default(),
            rng_seed: None,
        }
    }
}

/// Whether the output stream (and with it the clock) is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Suspended,
}

/// Owning handle to a connected engine.
///
/// Connecting probes the device, builds the paused stream, and spawns the
/// control thread. All control-surface methods are fire-and-forget message
/// sends; only stream control can fail. Dropping the engine shuts the
/// control thread down and tears the stream down.
pub struct AudioEngine {
    commands: Sender<EngineCommand>,
    controller: Option<JoinHandle<()>>,
    stream: OutputStream,
    clock: AudioClock,
    state: ClockState,
}

impl AudioEngine {
    /// Open the default output device and assemble the engine around it.
    ///
    /// The engine starts suspended; call [`resume`](Self::resume) from a
    /// user gesture to start the clock.
    pub fn connect(config: EngineConfig) -> Result<Self, AudioError> {
        let device = OutputDevice::probe()?;
        let sample_rate = device.sample_rate();
        let channels = device.channels();

        let clock = AudioClock::new(sample_rate);
        let (ring_tx, ring_rx) = rtrb::RingBuffer::new(config.ring_capacity.max(16));
        let mixer = Mixer::new(clock.clone(), ring_rx);
        let stream = device.open_stream(mixer)?;

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let controller = Controller::new(cmd_rx, ring_tx, clock.clone(), &config);
        let handle = thread::Builder::new()
            .name("breathe-control".into())
            .spawn(move || controller.run())
            .map_err(|_| AudioError::ControllerGone)?;

        tracing::info!(sample_rate, channels, "audio engine connected");

        Ok(Self {
            commands: cmd_tx,
            controller: Some(handle),
            stream,
            clock,
            state: ClockState::Suspended,
        })
    }

    /// Start the stream. Idempotent.
    pub fn resume(&mut self) -> Result<(), AudioError> {
        if self.state == ClockState::Running {
            return Ok(());
        }
        self.stream.play()?;
        self.state = ClockState::Running;
        tracing::info!("audio clock running");
        Ok(())
    }

    /// Pause the stream, freezing the clock. Idempotent.
    pub fn suspend(&mut self) -> Result<(), AudioError> {
        if self.state == ClockState::Suspended {
            return Ok(());
        }
        self.stream.pause()?;
        self.state = ClockState::Suspended;
        tracing::info!("audio clock suspended");
        Ok(())
    }

    pub fn clock_state(&self) -> ClockState {
        self.state
    }

    /// The device clock, for callers that want to align visuals.
    pub fn clock(&self) -> &AudioClock {
        &self.clock
    }

    pub fn set_ambient_enabled(&self, enabled: bool) {
        self.send(EngineCommand::SetAmbientEnabled(enabled));
    }

    pub fn set_ambient_timbre(&self, timbre: AmbientTimbre) {
        self.send(EngineCommand::SetAmbientTimbre(timbre));
    }

    pub fn set_exhale_cue(&self, kind: CueKind) {
        self.send(EngineCommand::SetExhaleCue(kind));
    }

    /// Begin the alternating inhale/exhale cue loop.
    pub fn start_breath_loop(&self, inhale_ms: u32, exhale_ms: u32) {
        if self.state == ClockState::Suspended {
            tracing::warn!("breath loop started while suspended; cues wait for resume");
        }
        self.send(EngineCommand::StartBreathLoop {
            inhale: Duration::from_millis(inhale_ms.into()),
            exhale: Duration::from_millis(exhale_ms.into()),
        });
    }

    /// Stop the loop and force-silence every tracked cue voice.
    pub fn stop_breath_loop(&self) {
        self.send(EngineCommand::StopBreathLoop);
    }

    /// One-shot end-of-session chime; rings out even across a stop.
    pub fn play_completion_chime(&self) {
        self.send(EngineCommand::PlayChime);
    }

    fn send(&self, cmd: EngineCommand) {
        if self.commands.send(cmd).is_err() {
            tracing::warn!(error = %AudioError::ControllerGone, "engine command dropped");
        }
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        let _ = self.commands.send(EngineCommand::Shutdown);
        if let Some(handle) = self.controller.take() {
            let _ = handle.join();
        }
    }
}
