//! Inhale swell.
//!
//! A short rising sine that tells the listener to start breathing in. The
//! same voice is used no matter which exhale style is selected, so the "in"
//! half of every breath sounds identical across soundscapes.
//!
//! # How It Works
//!
//! 1. Sine sweeps up an octave, 600 Hz to 1200 Hz, over the first 100 ms
//! 2. Gain snaps up to 0.3 in 10 ms, then decays away by 150 ms
//! 3. The voice ends at 200 ms, leaving silence until the exhale cue

use crate::cues::CueVoice;
use crate::dsp::automation::ParamLane;
use crate::graph::{envelope::EnvNode, extensions::NodeExt, tone::ToneNode};

pub fn inhale() -> CueVoice {
    let frequency = ParamLane::new(600.0).exp_to(0.1, 1200.0);
    let gain = ParamLane::new(0.0).linear_to(0.01, 0.3).exp_to(0.15, 0.001);

    let voice = ToneNode::sine(frequency).amplify(EnvNode::new(gain));
    CueVoice::new(voice, 0.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::tests::render_voice;

    #[test]
    fn swell_peaks_early_then_fades() {
        let sample_rate = 8_000.0;
        let mut voice = inhale();
        let samples = render_voice(&mut voice, sample_rate);

        let peak_at = |from: usize, to: usize| {
            samples[from..to].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
        };

        // Loud right after the 10 ms attack, nearly gone by the end.
        let attack = peak_at(80, 240);
        let tail = peak_at(1_400, 1_600);
        assert!(attack > 0.2, "attack peak {attack}");
        assert!(tail < 0.01, "tail should be inaudible, got {tail}");
    }

    #[test]
    fn pitch_rises_through_the_swell() {
        let sample_rate = 48_000.0;
        let mut voice = inhale();
        let samples = render_voice(&mut voice, sample_rate);

        let crossings = |window: &[f32]| {
            window.windows(2).filter(|w| w[0] <= 0.0 && w[1] > 0.0).count()
        };
        // 25 ms windows near the start and near the end of the sweep.
        let early = crossings(&samples[0..1_200]);
        let late = crossings(&samples[3_600..4_800]);
        assert!(
            late > early,
            "sweep should rise: early={early} crossings, late={late}"
        );
    }
}
