//! Echo exhale.
//!
//! A descending sonar ping that repeats into the distance. The dry ping is
//! over in half a second; the feedback delay keeps answering for another
//! three, so this voice lives far longer than its source.
//!
//! # How It Works
//!
//! 1. Sine glides 300 Hz down to 150 Hz over 200 ms
//! 2. Gain rises to 0.5 in 150 ms, decays away by 500 ms, and is cut
//!    entirely at 600 ms
//! 3. The ping feeds a 400 ms delay with 0.25 feedback; a 350 Hz lowpass
//!    in the loop darkens each repeat
//! 4. The voice stays alive 3.6 s so the echo tail can fully fade

use crate::cues::CueVoice;
use crate::dsp::automation::ParamLane;
use crate::graph::{echo::EchoNode, envelope::EnvNode, extensions::NodeExt, tone::ToneNode};

pub fn echo(sample_rate: f32) -> CueVoice {
    let frequency = ParamLane::new(300.0).exp_to(0.2, 150.0);
    let gain = ParamLane::new(0.0)
        .linear_to(0.15, 0.5)
        .exp_to(0.5, 0.001)
        .set_at(0.6, 0.0);

    let voice = ToneNode::sine(frequency)
        .amplify(EnvNode::new(gain))
        .through(EchoNode::new(0.4, 0.25, 350.0, sample_rate));

    CueVoice::new(voice, 3.6)
}
