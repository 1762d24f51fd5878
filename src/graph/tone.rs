use crate::{
    dsp::automation::ParamLane,
    dsp::oscillator::{Oscillator, Waveform},
    graph::node::{RenderCtx, SignalNode},
};

/// Oscillator whose frequency follows an automation lane.
///
/// Pitch sweeps are the backbone of every tonal cue here: a sonar ping
/// falling from 300 Hz to 150 Hz, a swell rising 600 Hz to 1200 Hz. The lane
/// is sampled per sample, so glides stay smooth at any block size.
pub struct ToneNode {
    osc: Oscillator,
    frequency: ParamLane,
}

impl ToneNode {
    pub fn new(waveform: Waveform, frequency: ParamLane) -> Self {
        Self {
            osc: Oscillator::new(waveform),
            frequency,
        }
    }

    pub fn sine(frequency: ParamLane) -> Self {
        Self::new(Waveform::Sine, frequency)
    }

    pub fn triangle(frequency: ParamLane) -> Self {
        Self::new(Waveform::Triangle, frequency)
    }
}

impl SignalNode for ToneNode {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            let f = self.frequency.sample(ctx.sample_time(i));
            *sample = self.osc.next_sample(f, ctx.sample_rate);
        }
    }
}
