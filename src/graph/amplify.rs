use crate::{
    graph::node::{RenderCtx, SignalNode},
    MAX_BLOCK_SIZE,
};

/// Multiply two signals together.
///
/// The usual pairing is a source and an `EnvNode`, which turns the envelope
/// lane into the source's loudness contour. Both sides are real nodes, so
/// tremolo (source x LFO) falls out of the same combinator.
pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: SignalNode, M: SignalNode> SignalNode for Amplify<N, M> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render(out, ctx);

        // Slice temp buffer to match output size (RT-safe, no allocation)
        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.modulator.render(frames, ctx);

        for (o, m) in out.iter_mut().zip(frames.iter()) {
            *o *= *m;
        }
    }
}
