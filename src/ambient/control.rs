//! Start/stop/swap policy for the ambient bed.
//!
//! The mixer only ever sees build and fade-out commands; deciding *when* to
//! issue them lives here, on the control thread. The one interesting rule is
//! the timbre swap: the old bed fades out immediately, but the replacement is
//! deferred by a short gap so the swap reads as "one sound ends, another
//! begins" rather than an abrupt morph.

use std::time::{Duration, Instant};

use super::AmbientTimbre;

/// Silence between fading the old bed and building its replacement.
pub const RESTART_GAP: Duration = Duration::from_millis(650);

/// What the controller should do to the mixer, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientAction {
    /// Build a fresh bed with this timbre and hand it to the mixer.
    Start(AmbientTimbre),
    /// Fade out and drop the live bed.
    Stop,
}

/// Control-side view of the bed lifecycle.
///
/// `bed_live` tracks whether the mixer has (or is about to receive) a bed,
/// not whether its fade-out has finished draining; the mixer handles that on
/// its own.
pub struct AmbientControl {
    timbre: AmbientTimbre,
    enabled: bool,
    bed_live: bool,
    restart_at: Option<Instant>,
}

impl AmbientControl {
    pub fn new(timbre: AmbientTimbre) -> Self {
        Self {
            timbre,
            enabled: false,
            bed_live: false,
            restart_at: None,
        }
    }

    pub fn timbre(&self) -> AmbientTimbre {
        self.timbre
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the soundscape on or off. Repeated calls with the same value do
    /// nothing, so a bed mid-restart-gap is not cut short by a stray enable.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<AmbientAction> {
        if enabled == self.enabled {
            return None;
        }
        self.enabled = enabled;

        if enabled {
            self.bed_live = true;
            Some(AmbientAction::Start(self.timbre))
        } else {
            // Disabling also cancels a pending restart; otherwise the swap
            // gap could resurrect a bed the user just turned off.
            self.restart_at = None;
            if self.bed_live {
                self.bed_live = false;
                Some(AmbientAction::Stop)
            } else {
                None
            }
        }
    }

    /// Select a timbre. While disabled this only records the preference;
    /// while enabled it fades the current bed and arms the restart gap.
    pub fn set_timbre(&mut self, timbre: AmbientTimbre, now: Instant) -> Option<AmbientAction> {
        if timbre == self.timbre && self.bed_live {
            return None;
        }
        self.timbre = timbre;
        if !self.enabled {
            return None;
        }

        self.restart_at = Some(now + RESTART_GAP);
        if self.bed_live {
            self.bed_live = false;
            Some(AmbientAction::Stop)
        } else {
            None
        }
    }

    /// Fire the deferred restart once its deadline passes.
    pub fn poll(&mut self, now: Instant) -> Option<AmbientAction> {
        let due = match self.restart_at {
            Some(at) if now >= at => true,
            _ => false,
        };
        if !due {
            return None;
        }
        self.restart_at = None;
        if self.enabled && !self.bed_live {
            self.bed_live = true;
            Some(AmbientAction::Start(self.timbre))
        } else {
            None
        }
    }

    /// When the control thread next needs to wake up for this policy.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.restart_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_starts_once() {
        let mut ctl = AmbientControl::new(AmbientTimbre::Deep);
        assert_eq!(
            ctl.set_enabled(true),
            Some(AmbientAction::Start(AmbientTimbre::Deep))
        );
        assert_eq!(ctl.set_enabled(true), None, "second enable must not restart");
    }

    #[test]
    fn disable_stops_and_is_idempotent() {
        let mut ctl = AmbientControl::new(AmbientTimbre::Deep);
        ctl.set_enabled(true);
        assert_eq!(ctl.set_enabled(false), Some(AmbientAction::Stop));
        assert_eq!(ctl.set_enabled(false), None);
    }

    #[test]
    fn timbre_swap_stops_then_restarts_after_gap() {
        let mut ctl = AmbientControl::new(AmbientTimbre::Deep);
        ctl.set_enabled(true);

        let t0 = Instant::now();
        assert_eq!(
            ctl.set_timbre(AmbientTimbre::Trench, t0),
            Some(AmbientAction::Stop)
        );
        assert_eq!(ctl.next_deadline(), Some(t0 + RESTART_GAP));

        // Not due yet.
        assert_eq!(ctl.poll(t0 + Duration::from_millis(100)), None);
        assert_eq!(
            ctl.poll(t0 + RESTART_GAP),
            Some(AmbientAction::Start(AmbientTimbre::Trench))
        );
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn same_timbre_while_live_is_a_no_op() {
        let mut ctl = AmbientControl::new(AmbientTimbre::Deep);
        ctl.set_enabled(true);
        assert_eq!(ctl.set_timbre(AmbientTimbre::Deep, Instant::now()), None);
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn timbre_while_disabled_only_records_preference() {
        let mut ctl = AmbientControl::new(AmbientTimbre::Deep);
        assert_eq!(ctl.set_timbre(AmbientTimbre::Trench, Instant::now()), None);
        assert_eq!(ctl.next_deadline(), None);
        assert_eq!(ctl.timbre(), AmbientTimbre::Trench);

        // The preference is honored on the next enable.
        assert_eq!(
            ctl.set_enabled(true),
            Some(AmbientAction::Start(AmbientTimbre::Trench))
        );
    }

    #[test]
    fn disable_cancels_pending_restart() {
        let mut ctl = AmbientControl::new(AmbientTimbre::Deep);
        ctl.set_enabled(true);

        let t0 = Instant::now();
        ctl.set_timbre(AmbientTimbre::Trench, t0);
        assert_eq!(ctl.set_enabled(false), None, "bed already stopped by the swap");
        assert_eq!(ctl.next_deadline(), None);
        assert_eq!(ctl.poll(t0 + RESTART_GAP * 2), None);
    }

    #[test]
    fn swap_mid_gap_rearms_the_deadline() {
        let mut ctl = AmbientControl::new(AmbientTimbre::Deep);
        ctl.set_enabled(true);

        let t0 = Instant::now();
        ctl.set_timbre(AmbientTimbre::Trench, t0);
        let t1 = t0 + Duration::from_millis(300);
        // No live bed to stop, but the gap restarts from the newer call.
        assert_eq!(ctl.set_timbre(AmbientTimbre::Deep, t1), None);
        assert_eq!(ctl.next_deadline(), Some(t1 + RESTART_GAP));
        assert_eq!(
            ctl.poll(t1 + RESTART_GAP),
            Some(AmbientAction::Start(AmbientTimbre::Deep))
        );
    }
}
