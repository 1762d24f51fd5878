//! Phase-accumulator oscillator.
//!
//! Every tonal cue in the engine lives well below 1.5 kHz, so naive waveform
//! evaluation is clean enough; there is no band-limiting machinery here.

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
}

/// Single oscillator with a normalized phase in `[0, 1)`.
///
/// Frequency is supplied per sample rather than stored, so a caller can sweep
/// pitch continuously without phase discontinuities.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Triangle => {
                // Rises from zero so amplitude envelopes open onto a
                // zero crossing.
                if self.phase < 0.25 {
                    4.0 * self.phase
                } else if self.phase < 0.75 {
                    2.0 - 4.0 * self.phase
                } else {
                    4.0 * self.phase - 4.0
                }
            }
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn sine_starts_at_zero_and_peaks_a_quarter_cycle_in() {
        let mut osc = Oscillator::sine();
        // 480 Hz at 48 kHz puts one cycle in exactly 100 samples.
        let cycle: Vec<f32> = (0..100).map(|_| osc.next_sample(480.0, SAMPLE_RATE)).collect();

        assert!(cycle[0].abs() < 1e-6);
        assert!((cycle[25] - 1.0).abs() < 1e-3);
        assert!((cycle[75] + 1.0).abs() < 1e-3);
    }

    #[test]
    fn triangle_is_linear_between_turning_points() {
        let mut osc = Oscillator::triangle();
        let cycle: Vec<f32> = (0..100).map(|_| osc.next_sample(480.0, SAMPLE_RATE)).collect();

        assert!(cycle[0].abs() < 1e-6);
        assert!((cycle[25] - 1.0).abs() < 1e-3);
        assert!((cycle[75] + 1.0).abs() < 1e-3);
        // Halfway up the rising edge.
        assert!((cycle[12] - 0.48).abs() < 1e-2);
    }

    #[test]
    fn phase_wraps_without_drifting() {
        let mut osc = Oscillator::sine();
        for _ in 0..SAMPLE_RATE as usize {
            osc.next_sample(997.0, SAMPLE_RATE);
        }
        assert!(osc.phase >= 0.0 && osc.phase < 1.0);
    }

    #[test]
    fn swept_frequency_keeps_phase_continuous() {
        let mut osc = Oscillator::sine();
        let mut previous = osc.next_sample(300.0, SAMPLE_RATE);
        for i in 1..4_800 {
            // Sweep 300 Hz down to 150 Hz, like a descending cue.
            let f = 300.0 - 150.0 * (i as f32 / 4_800.0);
            let sample = osc.next_sample(f, SAMPLE_RATE);
            // Adjacent samples of a sub-kilohertz sine never jump far.
            assert!((sample - previous).abs() < 0.1);
            previous = sample;
        }
    }

    #[test]
    fn reset_returns_to_initial_phase() {
        let mut osc = Oscillator::triangle();
        osc.next_sample(440.0, SAMPLE_RATE);
        osc.next_sample(440.0, SAMPLE_RATE);
        osc.reset();
        assert_eq!(osc.next_sample(440.0, SAMPLE_RATE), 0.0);
    }
}
