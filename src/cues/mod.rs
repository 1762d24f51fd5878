//! Breath cue voices.
//!
//! Every cue is a short, fully scheduled one-shot: its pitch and loudness
//! contours are automation lanes fixed at build time, so rendering one is
//! deterministic given the graph. Builders run on the control thread (they
//! allocate); the finished voice is handed to the audio thread to render.
//!
//! Exhale cues come in four interchangeable styles. The inhale swell and the
//! completion chime each have a single fixed shape.

/// Muffled low thump, like a tone heard from deep underwater.
pub mod abyss;
/// Pink-noise swell with scattered sine chirps.
pub mod bubbles;
/// Three-note chime that rings out at the end of a session.
pub mod chime;
/// Descending sonar ping with a feedback echo tail.
pub mod echo;
/// Short rising swell marking the start of an inhale.
pub mod inhale;
/// Deep two-layer pulse falling into the sub register.
pub mod pulsar;

pub use abyss::abyss;
pub use bubbles::bubbles;
pub use chime::chime;
pub use echo::echo;
pub use inhale::inhale;
pub use pulsar::pulsar;

use rand::rngs::SmallRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::SignalNode;

/// Which exhale voice the scheduler builds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    Echo,
    Abyss,
    Pulsar,
    Bubbles,
}

impl Default for CueKind {
    fn default() -> Self {
        CueKind::Bubbles
    }
}

/// A built one-shot voice plus how long the mixer should keep it alive.
///
/// `duration_secs` covers the audible life of the voice including any
/// effect tail; the mixer frees the voice once it has rendered that long.
pub struct CueVoice {
    pub node: Box<dyn SignalNode>,
    pub duration_secs: f64,
}

impl CueVoice {
    pub fn new(node: impl SignalNode + 'static, duration_secs: f64) -> Self {
        Self {
            node: Box::new(node),
            duration_secs,
        }
    }
}

/// Build the exhale cue for `kind`.
pub fn exhale(kind: CueKind, sample_rate: f32, rng: &mut SmallRng) -> CueVoice {
    match kind {
        CueKind::Echo => echo(sample_rate),
        CueKind::Abyss => abyss(),
        CueKind::Pulsar => pulsar(),
        CueKind::Bubbles => bubbles(sample_rate, rng),
    }
}
