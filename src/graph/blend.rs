use crate::{
    graph::node::{RenderCtx, SignalNode},
    MAX_BLOCK_SIZE,
};

/*
Parallel Layering (Blend)
=========================

Blend sums two signals, the way independently gained layers land on a shared
bus. Each side is expected to carry its own level (an Amplify with its gain
lane), so no weighting happens here:

    output = A + B

That matters for this engine's voices: a deep pulse is a 70 Hz sine layer
at full level plus a 140 Hz triangle layer at 0.3, and the layers' separate
envelopes already encode that balance. A crossfade-style mix would re-scale
both and quietly break every calibrated loudness contour.

Headroom is the caller's job: layered cue levels here were chosen so their
sum stays well under full scale.
*/

pub struct Blend<A, B> {
    pub layer_a: A,
    pub layer_b: B,
    temp_buffer: Vec<f32>,
}

impl<A, B> Blend<A, B> {
    pub fn new(layer_a: A, layer_b: B) -> Self {
        Self {
            layer_a,
            layer_b,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<A: SignalNode, B: SignalNode> SignalNode for Blend<A, B> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.layer_a.render(out, ctx);

        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.layer_b.render(frames, ctx);

        for (o, b) in out.iter_mut().zip(frames.iter()) {
            *o += *b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::automation::ParamLane;
    use crate::graph::envelope::EnvNode;
    use crate::graph::extensions::NodeExt;
    use crate::graph::tone::ToneNode;

    const SAMPLE_RATE: f32 = 1_000.0;

    #[test]
    fn layers_sum_sample_by_sample() {
        let mut a = EnvNode::constant(0.25);
        let mut b = EnvNode::constant(0.5);
        let mut blended = EnvNode::constant(0.25).blend(EnvNode::constant(0.5));

        let ctx = RenderCtx::start(SAMPLE_RATE);
        let mut buf_a = vec![0.0; 64];
        let mut buf_b = vec![0.0; 64];
        let mut buf_sum = vec![0.0; 64];
        a.render(&mut buf_a, &ctx);
        b.render(&mut buf_b, &ctx);
        blended.render(&mut buf_sum, &ctx);

        for i in 0..64 {
            assert_eq!(buf_sum[i], buf_a[i] + buf_b[i]);
        }
    }

    #[test]
    fn each_layer_keeps_its_own_level() {
        // Full-level fundamental plus a quieter upper layer.
        let primary = ToneNode::sine(ParamLane::constant(70.0))
            .amplify(EnvNode::constant(1.0));
        let secondary = ToneNode::triangle(ParamLane::constant(140.0))
            .amplify(EnvNode::constant(0.3));
        let mut layered = primary.blend(secondary);

        let mut buffer = vec![0.0; 1_000];
        layered.render(&mut buffer, &RenderCtx::start(SAMPLE_RATE));

        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        // The sum can exceed either layer alone but not 1.0 + 0.3.
        assert!(peak > 0.9);
        assert!(peak <= 1.3);
    }
}
