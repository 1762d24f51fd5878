//! Lookahead scheduling of breath cues against the device clock.
/*
    The cadence problem
    ===================

    Breathing guidance needs cues that land on a strict grid:

        t0        t0+inhale      t0+inhale+exhale
        |inhale.......|exhale..........|inhale....
        ^             ^                ^
        swell         exhale cue       swell

    A wall-clock timer cannot deliver that grid directly: the control
    thread can be descheduled, the process can stall, and a cue fired
    "when the timer happens to wake" would drift audibly within a few
    breaths.

    So the scheduler never plays anything itself. On a coarse 250ms tick
    it walks `next_event_time` forward and emits, for every grid point
    inside the next 1.5 seconds, an event stamped with its absolute time
    on the *device* clock. The mixer holds each voice until the clock
    reaches that stamp. A late tick only delays how far ahead the next
    batch is queued; every event already emitted still sounds exactly on
    its grid point. As long as the control thread is not blocked longer
    than the lookahead window minus one tick, the grid never misses.

    State is deliberately tiny: the grid is fully described by the next
    event's time and phase, so a stop/start or a cadence change needs no
    queue surgery.
*/

use std::time::Duration;

/// Wall-clock cadence of the control thread's scheduling pass.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// How far ahead of the device clock events are queued. Must comfortably
/// exceed `TICK_INTERVAL` or grid points could slip past unqueued.
pub const LOOKAHEAD_SECS: f64 = 1.5;

/// Offset of the first event past "now", so the clock has provably moved
/// past the start time before the first voice must sound.
pub const START_GUARD_SECS: f64 = 0.1;

/// Floor for either phase duration. Keeps a malformed request from
/// collapsing the grid into a zero-period spin.
const MIN_PHASE_SECS: f64 = 0.05;

/// Which half of the breath the cue marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathPhase {
    Inhale,
    Exhale,
}

/// One grid point: an absolute device-clock time and its phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueEvent {
    pub time: f64,
    pub phase: BreathPhase,
}

/// The breath-loop state machine. `Idle -> Running -> Idle`.
pub struct BreathScheduler {
    inhale_secs: f64,
    exhale_secs: f64,
    next_event_time: f64,
    next_is_inhale: bool,
    running: bool,
}

impl BreathScheduler {
    pub fn new() -> Self {
        Self {
            inhale_secs: MIN_PHASE_SECS,
            exhale_secs: MIN_PHASE_SECS,
            next_event_time: 0.0,
            next_is_inhale: true,
            running: false,
        }
    }

    /// Begin (or retune) the loop. Durations always update, so a repeated
    /// start changes the cadence of events not yet queued; the existing
    /// grid position is kept and no second schedule is created. Returns
    /// whether this call started a fresh loop.
    pub fn start(&mut self, inhale_secs: f64, exhale_secs: f64, now: f64) -> bool {
        self.inhale_secs = inhale_secs.max(MIN_PHASE_SECS);
        self.exhale_secs = exhale_secs.max(MIN_PHASE_SECS);

        if self.running {
            return false;
        }
        self.running = true;
        self.next_is_inhale = true;
        self.next_event_time = now + START_GUARD_SECS;
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Queue every grid point inside the lookahead window.
    ///
    /// The grid advances *before* each event is handed out, so a failure
    /// while building one cue can never stall or skew the cadence.
    pub fn tick(&mut self, now: f64, emit: &mut impl FnMut(CueEvent)) {
        if !self.running {
            return;
        }

        while self.next_event_time < now + LOOKAHEAD_SECS {
            let time = self.next_event_time;
            let phase = if self.next_is_inhale {
                BreathPhase::Inhale
            } else {
                BreathPhase::Exhale
            };

            self.next_event_time += match phase {
                BreathPhase::Inhale => self.inhale_secs,
                BreathPhase::Exhale => self.exhale_secs,
            };
            self.next_is_inhale = !self.next_is_inhale;

            emit(CueEvent { time, phase });
        }
    }
}

impl Default for BreathScheduler {
    fn default() -> Self {
        Self::new()
    }
}
