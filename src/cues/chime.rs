//! Completion chime.
//!
//! A G major triad (G3, D4, G4) that swells gently and rings for four
//! seconds, marking the natural end of a session. Unlike breath cues, the
//! chime is meant to ring out even as the engine winds down, so the
//! scheduler deliberately leaves it off the hard-stop list.
//!
//! # How It Works
//!
//! 1. Three sines at 196, 293, and 392 Hz
//! 2. Each swells to a modest 0.1 over half a second
//! 3. A long exponential decay brings them to silence at 4 s

use crate::cues::CueVoice;
use crate::dsp::automation::ParamLane;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, tone::ToneNode};

const TRIAD_HZ: [f32; 3] = [196.0, 293.0, 392.0];

pub fn chime() -> CueVoice {
    let partial = |hz: f32| {
        ToneNode::sine(ParamLane::constant(hz)).amplify(EnvNode::new(
            ParamLane::new(0.0).linear_to(0.5, 0.1).exp_to(4.0, 0.001),
        ))
    };

    let [root, fifth, octave] = TRIAD_HZ;
    let voice = partial(root).blend(partial(fifth)).blend(partial(octave));
    CueVoice::new(voice, 4.0)
}
