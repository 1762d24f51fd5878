use crate::{
    dsp::delay::FeedbackEcho,
    graph::node::{RenderCtx, SignalNode},
};

/// Feedback echo as an in-place effect.
///
/// The delay line is sized at construction, so the node needs to know the
/// sample rate up front; cue builders get that from the engine.
pub struct EchoNode {
    echo: FeedbackEcho,
}

impl EchoNode {
    pub fn new(delay_secs: f32, feedback: f32, damping_hz: f32, sample_rate: f32) -> Self {
        Self {
            echo: FeedbackEcho::new(delay_secs, feedback, damping_hz, sample_rate),
        }
    }
}

impl SignalNode for EchoNode {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.echo.render(out, ctx.sample_rate);
    }
}
