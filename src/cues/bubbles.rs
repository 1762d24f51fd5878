//! Bubbles exhale.
//!
//! A soft rush of air breaking into scattered bubbles. This is the default
//! exhale voice, and the only one with randomness inside the voice itself:
//! every exhale scatters its chirps differently, which keeps a long session
//! from sounding stamped out.
//!
//! # How It Works
//!
//! 1. A fresh pink-noise bed swells to 0.4 over 100 ms and drains away by
//!    600 ms, while its lowpass closes from 200 Hz to 100 Hz
//! 2. Six sine chirps are scattered over the first 400 ms, each with a
//!    random start, length (100 - 200 ms), and upward frequency ramp
//!    (start 200 - 600 Hz, rising a further 100 - 300 Hz)
//! 3. Chirps peak at 0.15 a fifth of the way in, decay to nothing, and are
//!    cut 50 ms after their ramp ends

use rand::rngs::SmallRng;
use rand::Rng;

use crate::cues::CueVoice;
use crate::dsp::automation::ParamLane;
use crate::graph::{
    blend::Blend, envelope::EnvNode, extensions::NodeExt, filter::FilterNode,
    noise::NoiseNode, tone::ToneNode, SignalNode,
};

const CHIRP_COUNT: usize = 6;

pub fn bubbles(sample_rate: f32, rng: &mut SmallRng) -> CueVoice {
    let swell_gain = ParamLane::new(0.0).linear_to(0.1, 0.4).linear_to(0.6, 0.0);
    let closing_cutoff = ParamLane::new(200.0).linear_to(0.6, 100.0);

    let swell = NoiseNode::pink(sample_rate, rng)
        .through(FilterNode::lowpass_swept(closing_cutoff))
        .amplify(EnvNode::new(swell_gain));

    let mut voice: Box<dyn SignalNode> = Box::new(swell);
    let mut duration: f64 = 0.7;

    for _ in 0..CHIRP_COUNT {
        let offset: f64 = rng.gen_range(0.0..0.4);
        let length: f64 = rng.gen_range(0.1..0.2);
        let start_hz: f32 = rng.gen_range(200.0..600.0);
        let end_hz: f32 = start_hz + rng.gen_range(100.0..300.0);

        let frequency = ParamLane::new(start_hz)
            .set_at(offset, start_hz)
            .linear_to(offset + length, end_hz);
        let gain = ParamLane::new(0.0)
            .set_at(offset, 0.0)
            .linear_to(offset + length * 0.2, 0.15)
            .exp_to(offset + length, 0.001)
            .set_at(offset + length + 0.05, 0.0);

        let chirp = ToneNode::sine(frequency).amplify(EnvNode::new(gain));
        voice = Box::new(Blend::new(voice, chirp));
        duration = duration.max(offset + length + 0.05);
    }

    CueVoice {
        node: voice,
        duration_secs: duration,
    }
}
