//! Pulsar exhale.
//!
//! A deep two-layer pulse that sinks into the sub register, felt as much as
//! heard. The fundamental drops below the bottom of most small speakers, so
//! a quieter triangle layer an octave up carries the pitch contour.
//!
//! # How It Works
//!
//! 1. Sine fundamental glides 70 Hz down to 45 Hz over 300 ms, full level,
//!    decaying away by 800 ms
//! 2. Triangle layer glides 140 Hz down to 90 Hz, at 0.3 level, gone by
//!    600 ms
//! 3. Each layer keeps its own envelope; the blend just sums them

use crate::cues::CueVoice;
use crate::dsp::automation::ParamLane;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, tone::ToneNode};

pub fn pulsar() -> CueVoice {
    let fundamental = ToneNode::sine(ParamLane::new(70.0).exp_to(0.3, 45.0)).amplify(
        EnvNode::new(ParamLane::new(0.0).linear_to(0.05, 1.0).exp_to(0.8, 0.001)),
    );

    let overtone = ToneNode::triangle(ParamLane::new(140.0).exp_to(0.3, 90.0)).amplify(
        EnvNode::new(ParamLane::new(0.0).linear_to(0.05, 0.3).exp_to(0.6, 0.001)),
    );

    CueVoice::new(fundamental.blend(overtone), 0.9)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::tests::render_voice;

    #[test]
    fn pulse_decays_across_its_life() {
        let sample_rate = 8_000.0;
        let mut voice = pulsar();
        let samples = render_voice(&mut voice, sample_rate);

        let peak_at = |from: usize, to: usize| {
            samples[from..to].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
        };

        let body = peak_at(400, 1_600); // 50 - 200 ms
        let late = peak_at(5_600, 7_200); // 700 - 900 ms
        assert!(body > 0.5, "body peak {body}");
        assert!(late < 0.05, "pulse should be spent by the end, got {late}");
    }

    #[test]
    fn layers_sum_within_headroom() {
        let sample_rate = 8_000.0;
        let mut voice = pulsar();
        let samples = render_voice(&mut voice, sample_rate);

        let peak = samples[..1_600].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        // Near-unity body from the fundamental plus the 0.3 layer on top,
        // never past their sum.
        assert!(peak > 0.9, "attack body too quiet, got {peak}");
        assert!(peak < 1.31, "layer sum bounded by 1.0 + 0.3, got {peak}");
    }
}
