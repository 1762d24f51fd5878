use rand::rngs::SmallRng;

use crate::{
    dsp::noise::{brown_buffer, pink_buffer, LoopingBuffer, NOISE_LOOP_SECS},
    graph::node::{RenderCtx, SignalNode},
};

/// Looping noise source.
///
/// The buffer is generated at construction time on the control thread, so
/// the audio thread only ever replays it. Bubble cues build a fresh pink
/// buffer per voice; soundscape beds build one per bed.
pub struct NoiseNode {
    buffer: LoopingBuffer,
}

impl NoiseNode {
    pub fn pink(sample_rate: f32, rng: &mut SmallRng) -> Self {
        Self {
            buffer: LoopingBuffer::new(pink_buffer(NOISE_LOOP_SECS, sample_rate, rng)),
        }
    }

    pub fn brown(sample_rate: f32, rng: &mut SmallRng) -> Self {
        Self {
            buffer: LoopingBuffer::new(brown_buffer(NOISE_LOOP_SECS, sample_rate, rng)),
        }
    }
}

impl SignalNode for NoiseNode {
    fn render(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.buffer.render(out);
    }
}
