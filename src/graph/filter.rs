use crate::{
    dsp::automation::ParamLane,
    dsp::filter::LowPass,
    graph::node::{Modulatable, RenderCtx, SignalNode},
};

/*
Lowpass Filter Node
===================

Every filter in this engine is a lowpass: darkening noise into water,
muffling a triangle wave into something heard from below the surface. What
varies is how the cutoff moves, and the node supports both ways it can:

1. A scheduled sweep. The cutoff is a ParamLane, so a bubble swell can ramp
   its filter from 200 Hz down to 100 Hz over the life of the voice:

     FilterNode::lowpass_swept(ParamLane::new(200.0).linear_to(0.6, 100.0))

2. Block-rate modulation. Wrapping the node in `.modulate()` adds an LFO
   offset on top of whatever the lane says:

     FilterNode::lowpass(200.0)
         .modulate(LfoNode::sine(0.08), FilterParam::Cutoff, 60.0)

Both feed the same place: each block the node evaluates its lane, adds the
applied offset, clamps, and hands the result to the DSP filter. Coefficients
therefore update once per block, which is plenty for sweeps this slow.

Resonance is fixed per node. The trench soundscape runs Q = 3 for its
resonant rumble; everything else keeps the default Q = 1.
*/

#[derive(Clone, Copy, Debug)]
pub enum FilterParam {
    Cutoff,
}

pub struct FilterNode {
    filter: LowPass,
    cutoff: ParamLane,
    cutoff_offset: f32,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::lowpass_swept(ParamLane::constant(cutoff_hz))
    }

    pub fn lowpass_swept(cutoff: ParamLane) -> Self {
        FilterNode {
            filter: LowPass::new(cutoff.value_at(0.0)),
            cutoff,
            cutoff_offset: 0.0,
        }
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn apply_modulation(&mut self, param: Self::Param, offset: f32) {
        match param {
            FilterParam::Cutoff => self.cutoff_offset = offset,
        }
    }
}

impl SignalNode for FilterNode {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let cutoff = self.cutoff.sample(ctx.time) + self.cutoff_offset;
        self.filter.set_cutoff(cutoff.clamp(20.0, 20_000.0));
        self.filter.render(out, ctx.sample_rate);
    }
}
