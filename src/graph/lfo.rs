use crate::{
    dsp::oscillator::Oscillator,
    graph::node::{RenderCtx, SignalNode},
};

/*
LFO (Low Frequency Oscillator)
==============================

An oscillator running at sub-audio frequency, used here to breathe life into
the soundscape beds: a 0.08 Hz sine slowly opening and closing a filter makes
a static noise loop feel like a moving body of water.

Output is bipolar in [-1, +1]; pair it with `.modulate()` and a depth to turn
it into parameter motion:

    FilterNode::lowpass(200.0)
        .modulate(LfoNode::sine(0.08), FilterParam::Cutoff, 60.0)

sweeps the cutoff between 140 Hz and 260 Hz over a 12.5 second cycle.

The LFO keeps its own fixed frequency rather than reading anything from the
render context, so modulation rate is independent of what the bed or voice
is doing.
*/

pub struct LfoNode {
    osc: Oscillator,
    frequency: f32,
}

impl LfoNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            osc: Oscillator::sine(),
            frequency,
        }
    }

    pub fn triangle(frequency: f32) -> Self {
        Self {
            osc: Oscillator::triangle(),
            frequency,
        }
    }
}

impl SignalNode for LfoNode {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.osc.next_sample(self.frequency, ctx.sample_rate);
        }
    }
}
