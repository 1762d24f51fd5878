use crate::{
    graph::node::{Modulatable, RenderCtx, SignalNode},
    MAX_BLOCK_SIZE,
};

/*
Modulate Node
=============

Connects an LFO (or any signal) to a parameter on another node. The
soundscape beds lean on this: their filter cutoffs drift slowly with an LFO
so the loop never sounds frozen.

Understanding Depth
-------------------

Depth scales the modulator's bipolar output into parameter units:

    applied_offset = average(modulator over the block) x depth

With cutoff = 200 Hz, depth = 60, and a sine LFO, the cutoff wanders between
140 Hz and 260 Hz.

Block-rate Modulation
---------------------

The modulator is rendered for the whole block and averaged, and the offset
applied once per block. For the LFO rates used here (well under 1 Hz) a
block is a tiny fraction of a cycle, so the staircase this introduces is far
below audibility, and the modulated node only recomputes its coefficients
once per block.
*/

pub struct Modulate<S, L>
where
    S: SignalNode + Modulatable,
    L: SignalNode,
{
    source: S,
    lfo: L,
    param: S::Param,
    depth: f32,
    lfo_buffer: Vec<f32>,
}

impl<S, L> Modulate<S, L>
where
    S: SignalNode + Modulatable,
    L: SignalNode,
{
    pub fn new(source: S, lfo: L, param: S::Param, depth: f32) -> Self {
        Self {
            source,
            lfo,
            param,
            depth,
            lfo_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

fn block_average(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    buffer.iter().sum::<f32>() / buffer.len() as f32
}

impl<S, L> SignalNode for Modulate<S, L>
where
    S: SignalNode + Modulatable,
    L: SignalNode,
{
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len();

        // Render the modulator (values in [-1.0, +1.0]) and collapse it to
        // one offset for the block.
        self.lfo.render(&mut self.lfo_buffer[..len], ctx);
        let offset = block_average(&self.lfo_buffer[..len]) * self.depth;

        self.source.apply_modulation(self.param, offset);
        self.source.render(out, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::extensions::NodeExt;
    use crate::graph::filter::{FilterNode, FilterParam};
    use crate::graph::lfo::LfoNode;
    use crate::graph::noise::NoiseNode;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn modulated_filter_keeps_output_finite() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut bed = NoiseNode::pink(1_000.0, &mut rng).through(
            FilterNode::lowpass(200.0).modulate(LfoNode::sine(0.5), FilterParam::Cutoff, 60.0),
        );

        let ctx = RenderCtx::start(1_000.0);
        let mut buffer = vec![0.0; 2_000];
        for chunk in buffer.chunks_mut(250) {
            bed.render(chunk, &ctx);
        }

        assert!(buffer.iter().all(|s| s.is_finite()));
        assert!(buffer.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn extreme_depth_is_clamped_by_the_target() {
        // The filter clamps its modulated cutoff, so even silly depths
        // cannot push it into instability.
        let mut filter =
            FilterNode::lowpass(200.0).modulate(LfoNode::sine(1.0), FilterParam::Cutoff, 100_000.0);

        let ctx = RenderCtx::start(48_000.0);
        let mut buffer = vec![0.1; 1_024];
        filter.render(&mut buffer, &ctx);

        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn average_of_empty_block_is_zero() {
        assert_eq!(block_average(&[]), 0.0);
        assert_eq!(block_average(&[0.5, -0.5]), 0.0);
    }
}
