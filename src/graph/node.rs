/// Context passed to graph nodes during rendering.
///
/// `time` is the owner-relative time of the FIRST sample in the block, in
/// seconds: seconds since the voice started for cue voices, seconds since
/// the bed started for soundscapes. Automation lanes are scheduled against
/// this clock.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }

    /// Context at the start of a voice's life.
    pub fn start(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            time: 0.0,
        }
    }

    /// Time of the `frame`th sample within the current block.
    #[inline]
    pub fn sample_time(&self, frame: usize) -> f64 {
        self.time + frame as f64 / self.sample_rate as f64
    }
}

/// Trait for nodes that expose a parameter to block-rate modulation.
pub trait Modulatable: Send {
    type Param: Copy + Send;

    /// Add `offset` to the parameter for subsequent renders. The offset
    /// replaces any previously applied one rather than accumulating.
    fn apply_modulation(&mut self, param: Self::Param, offset: f32);
}

/// Core trait for audio processing graph nodes.
///
/// Sources overwrite the buffer; effects transform it in place. Combinators
/// keep their own scratch buffers so a whole voice renders without
/// allocating.
pub trait SignalNode: Send {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx);
}

/// Allow boxed nodes to be used as nodes (for dynamic dispatch).
impl SignalNode for Box<dyn SignalNode> {
    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render(out, ctx)
    }
}
