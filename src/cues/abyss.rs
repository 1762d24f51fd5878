//! Abyss exhale.
//!
//! A single muffled thump, like a heavy object settling on the sea floor.
//! The simplest of the exhale voices: one triangle wave, one filter, one
//! envelope.
//!
//! # How It Works
//!
//! 1. Triangle at a fixed 80 Hz for a soft, slightly reedy body
//! 2. 600 Hz lowpass rounds off the triangle's upper harmonics
//! 3. Gain rises to 0.8 in 100 ms, then takes a slow 1.2 s glide to silence

use crate::cues::CueVoice;
use crate::dsp::automation::ParamLane;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, tone::ToneNode,
};

pub fn abyss() -> CueVoice {
    let gain = ParamLane::new(0.0).linear_to(0.1, 0.8).exp_to(1.2, 0.001);

    let voice = ToneNode::triangle(ParamLane::constant(80.0))
        .through(FilterNode::lowpass(600.0))
        .amplify(EnvNode::new(gain));

    CueVoice::new(voice, 1.3)
}
