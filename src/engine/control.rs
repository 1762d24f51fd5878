//! The control thread: scheduling decisions and voice construction.
//!
//! Every mutation of engine state funnels through here, so the breath
//! scheduler, the ambient policy, and the node tracker never see concurrent
//! access. The thread sleeps on its command channel with a deadline: it
//! wakes for a caller command, for the next 250ms scheduling pass, or for a
//! deferred ambient rebuild, whichever comes first.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rtrb::Producer;

use crate::ambient::{AmbientAction, AmbientBed, AmbientControl, AmbientTimbre};
use crate::cues::{self, CueKind};
use crate::engine::clock::AudioClock;
use crate::engine::mixer::MixerCommand;
use crate::engine::scheduler::{BreathPhase, BreathScheduler, CueEvent, TICK_INTERVAL};
use crate::engine::tracker::{NodeId, NodeTracker};
use crate::engine::EngineConfig;

/// Commands the facade forwards from the caller's thread.
pub enum EngineCommand {
    SetAmbientEnabled(bool),
    SetAmbientTimbre(AmbientTimbre),
    SetExhaleCue(CueKind),
    StartBreathLoop { inhale: Duration, exhale: Duration },
    StopBreathLoop,
    PlayChime,
    Shutdown,
}

/// State owned by the control thread.
pub struct Controller {
    commands: Receiver<EngineCommand>,
    mixer_tx: Producer<MixerCommand>,
    clock: AudioClock,
    scheduler: BreathScheduler,
    tracker: NodeTracker,
    ambient: AmbientControl,
    exhale_cue: CueKind,
    rng: SmallRng,
    next_node_id: NodeId,
    sample_rate: f32,
    next_tick: Instant,
}

impl Controller {
    pub fn new(
        commands: Receiver<EngineCommand>,
        mixer_tx: Producer<MixerCommand>,
        clock: AudioClock,
        config: &EngineConfig,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let sample_rate = clock.sample_rate() as f32;

        Self {
            commands,
            mixer_tx,
            clock,
            scheduler: BreathScheduler::new(),
            tracker: NodeTracker::new(),
            ambient: AmbientControl::new(config.ambient_timbre),
            exhale_cue: config.exhale_cue,
            rng,
            next_node_id: 1,
            sample_rate,
            next_tick: Instant::now() + TICK_INTERVAL,
        }
    }

    /// Run until `Shutdown` arrives or every facade handle is dropped.
    pub fn run(mut self) {
        tracing::debug!("engine control thread running");
        loop {
            let timeout = self
                .next_deadline()
                .saturating_duration_since(Instant::now());
            match self.commands.recv_timeout(timeout) {
                Ok(cmd) => {
                    if !self.handle(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.poll();
        }
        tracing::debug!("engine control thread exiting");
    }

    fn next_deadline(&self) -> Instant {
        match self.ambient.next_deadline() {
            Some(restart) => restart.min(self.next_tick),
            None => self.next_tick,
        }
    }

    /// Returns false when the thread should exit.
    fn handle(&mut self, cmd: EngineCommand) -> bool {
        match cmd {
            EngineCommand::SetAmbientEnabled(enabled) => {
                tracing::info!(enabled, "ambient soundscape toggled");
                if let Some(action) = self.ambient.set_enabled(enabled) {
                    self.apply_ambient(action);
                }
            }
            EngineCommand::SetAmbientTimbre(timbre) => {
                tracing::info!(?timbre, "ambient timbre selected");
                if let Some(action) = self.ambient.set_timbre(timbre, Instant::now()) {
                    self.apply_ambient(action);
                }
            }
            EngineCommand::SetExhaleCue(kind) => {
                tracing::info!(?kind, "exhale cue selected");
                self.exhale_cue = kind;
            }
            EngineCommand::StartBreathLoop { inhale, exhale } => {
                let started = self.scheduler.start(
                    inhale.as_secs_f64(),
                    exhale.as_secs_f64(),
                    self.clock.now(),
                );
                if started {
                    tracing::info!(?inhale, ?exhale, "breath loop started");
                } else {
                    tracing::debug!(?inhale, ?exhale, "breath loop retuned");
                }
                // Fill the lookahead window now rather than waiting up to
                // a whole tick interval.
                self.tick();
            }
            EngineCommand::StopBreathLoop => {
                self.scheduler.stop();
                let stopped = self.tracker.stop_all();
                tracing::info!(voices = stopped.len(), "breath loop stopped");
                for id in stopped {
                    self.send_to_mixer(MixerCommand::StopVoice { id });
                }
            }
            EngineCommand::PlayChime => {
                tracing::info!("completion chime");
                let voice = cues::chime();
                let id = self.alloc_id();
                // Untracked: the chime is allowed to ring out after a stop.
                self.send_to_mixer(MixerCommand::PlayVoice {
                    id,
                    at: self.clock.now(),
                    voice,
                });
            }
            EngineCommand::Shutdown => {
                tracing::debug!("shutdown requested");
                return false;
            }
        }
        true
    }

    /// Deadline-driven work: scheduling passes and deferred ambient builds.
    fn poll(&mut self) {
        let wall_now = Instant::now();
        while self.next_tick <= wall_now {
            // Advancing by the interval (not from `now`) keeps the cadence
            // drift-free across late wakeups.
            self.next_tick += TICK_INTERVAL;
            self.tick();
        }
        if let Some(action) = self.ambient.poll(wall_now) {
            self.apply_ambient(action);
        }
    }

    /// One scheduling pass against the device clock.
    fn tick(&mut self) {
        let now = self.clock.now();

        let mut events: Vec<CueEvent> = Vec::new();
        self.scheduler.tick(now, &mut |event| events.push(event));
        for event in events {
            self.schedule_cue(event);
        }

        self.tracker.prune(now);
    }

    fn schedule_cue(&mut self, event: CueEvent) {
        let voice = match event.phase {
            BreathPhase::Inhale => cues::inhale(),
            BreathPhase::Exhale => cues::exhale(self.exhale_cue, self.sample_rate, &mut self.rng),
        };
        let ends_at = event.time + voice.duration_secs;
        let id = self.alloc_id();

        tracing::debug!(id, at = event.time, phase = ?event.phase, "cue queued");
        if self.send_to_mixer(MixerCommand::PlayVoice {
            id,
            at: event.time,
            voice,
        }) {
            self.tracker.track(id, ends_at);
        }
    }

    fn apply_ambient(&mut self, action: AmbientAction) {
        match action {
            AmbientAction::Start(timbre) => {
                let bed = AmbientBed::build(timbre, self.sample_rate, &mut self.rng);
                tracing::debug!(?timbre, "ambient bed built");
                self.send_to_mixer(MixerCommand::BuildAmbient(bed));
            }
            AmbientAction::Stop => {
                self.send_to_mixer(MixerCommand::FadeOutAmbient);
            }
        }
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    fn send_to_mixer(&mut self, cmd: MixerCommand) -> bool {
        if self.mixer_tx.push(cmd).is_err() {
            tracing::warn!("mixer command ring full, dropping command");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;
    use std::sync::mpsc;

    fn controller() -> (
        mpsc::Sender<EngineCommand>,
        rtrb::Consumer<MixerCommand>,
        Controller,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (ring_tx, ring_rx) = RingBuffer::new(64);
        let clock = AudioClock::new(48_000);
        let config = EngineConfig {
            rng_seed: Some(42),
            ..EngineConfig::default()
        };
        let ctl = Controller::new(cmd_rx, ring_tx, clock, &config);
        (cmd_tx, ring_rx, ctl)
    }

    fn drain(ring: &mut rtrb::Consumer<MixerCommand>) -> Vec<MixerCommand> {
        let mut cmds = Vec::new();
        while let Ok(cmd) = ring.pop() {
            cmds.push(cmd);
        }
        cmds
    }

    #[test]
    fn start_fills_the_lookahead_window_immediately() {
        let (_tx, mut ring, mut ctl) = controller();
        ctl.handle(EngineCommand::StartBreathLoop {
            inhale: Duration::from_secs(1),
            exhale: Duration::from_secs(1),
        });

        let cmds = drain(&mut ring);
        let mut times = Vec::new();
        for cmd in &cmds {
            match cmd {
                MixerCommand::PlayVoice { at, .. } => times.push(*at),
                _ => panic!("unexpected command in ring"),
            }
        }
        // Grid points inside 1.5s: 0.1 (inhale) and 1.1 (exhale).
        assert_eq!(times.len(), 2);
        assert!((times[0] - 0.1).abs() < 1e-9);
        assert!((times[1] - 1.1).abs() < 1e-9);
        assert_eq!(ctl.tracker.len(), 2, "both cues tracked");
    }

    #[test]
    fn stop_force_stops_every_tracked_voice() {
        let (_tx, mut ring, mut ctl) = controller();
        ctl.handle(EngineCommand::StartBreathLoop {
            inhale: Duration::from_millis(400),
            exhale: Duration::from_millis(400),
        });
        let queued = drain(&mut ring).len();
        assert!(queued >= 3);

        ctl.handle(EngineCommand::StopBreathLoop);
        assert!(ctl.tracker.is_empty());

        let stops = drain(&mut ring)
            .into_iter()
            .filter(|cmd| matches!(cmd, MixerCommand::StopVoice { .. }))
            .count();
        assert_eq!(stops, queued, "one force-stop per queued voice");
    }

    #[test]
    fn chime_is_never_tracked() {
        let (_tx, mut ring, mut ctl) = controller();
        ctl.handle(EngineCommand::PlayChime);

        assert!(ctl.tracker.is_empty());
        let cmds = drain(&mut ring);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], MixerCommand::PlayVoice { .. }));

        // A stop right after the chime has nothing to silence.
        ctl.handle(EngineCommand::StopBreathLoop);
        let stops = drain(&mut ring)
            .into_iter()
            .filter(|cmd| matches!(cmd, MixerCommand::StopVoice { .. }))
            .count();
        assert_eq!(stops, 0);
    }

    #[test]
    fn exhale_cue_choice_binds_when_the_event_is_queued() {
        let (_tx, mut ring, mut ctl) = controller();
        ctl.handle(EngineCommand::SetExhaleCue(CueKind::Echo));
        ctl.handle(EngineCommand::StartBreathLoop {
            inhale: Duration::from_millis(200),
            exhale: Duration::from_millis(200),
        });

        // Exhale voices carry the echo's long tail, not the default cue.
        let mut saw_exhale = false;
        for cmd in drain(&mut ring) {
            if let MixerCommand::PlayVoice { voice, .. } = cmd {
                if (voice.duration_secs - 3.6).abs() < 1e-9 {
                    saw_exhale = true;
                }
            }
        }
        assert!(saw_exhale);
    }

    #[test]
    fn ambient_commands_flow_to_the_mixer() {
        let (_tx, mut ring, mut ctl) = controller();
        ctl.handle(EngineCommand::SetAmbientEnabled(true));
        let cmds = drain(&mut ring);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], MixerCommand::BuildAmbient(_)));

        ctl.handle(EngineCommand::SetAmbientEnabled(false));
        let cmds = drain(&mut ring);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], MixerCommand::FadeOutAmbient));
    }

    #[test]
    fn timbre_swap_defers_the_rebuild() {
        let (_tx, mut ring, mut ctl) = controller();
        ctl.handle(EngineCommand::SetAmbientEnabled(true));
        drain(&mut ring);

        ctl.handle(EngineCommand::SetAmbientTimbre(AmbientTimbre::Trench));
        let cmds = drain(&mut ring);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], MixerCommand::FadeOutAmbient));

        // The rebuild only fires once the gap has elapsed.
        assert!(ctl.ambient.poll(Instant::now()).is_none());
        if let Some(action) = ctl.ambient.poll(Instant::now() + crate::ambient::RESTART_GAP) {
            ctl.apply_ambient(action);
        }
        let cmds = drain(&mut ring);
        assert_eq!(cmds.len(), 1);
        assert!(matches!(cmds[0], MixerCommand::BuildAmbient(_)));
    }
}
