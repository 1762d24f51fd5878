use crate::{
    dsp::automation::ParamLane,
    graph::node::{RenderCtx, SignalNode},
};

/// Automation lane rendered as a control signal.
///
/// Cue loudness contours are fully scheduled up front, so an envelope here
/// is just a lane evaluated over voice time. Feed it to `.amplify()` to
/// shape a source:
///
///   ToneNode::sine(freq)
///       .amplify(EnvNode::new(ParamLane::new(0.0)
///           .linear_to(0.05, 1.0)
///           .exp_to(0.8, 0.001)))
pub struct EnvNode {
    lane: ParamLane,
}

impl EnvNode {
    pub fn new(lane: ParamLane) -> Self {
        Self { lane }
    }

    /// Flat gain. Useful for sub-layers that sit at a fixed level.
    pub fn constant(value: f32) -> Self {
        Self {
            lane: ParamLane::constant(value),
        }
    }
}

impl SignalNode for EnvNode {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.lane.sample(ctx.sample_time(i));
        }
    }
}
