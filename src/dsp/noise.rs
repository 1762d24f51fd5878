//! Looping pink and brown noise beds.
//!
//! Soundscapes here never use white noise directly; everything is pink
//! (bubbling water, surf) or brown (deep rumble). Both are generated once
//! into a buffer long enough that the loop seam hides under the lowpass
//! filtering applied downstream, then replayed forever.

use rand::rngs::SmallRng;
use rand::Rng;

/// Length of a generated noise bed. Ten seconds of decorrelated samples is
/// plenty for the ear to lose track of the repeat.
pub const NOISE_LOOP_SECS: f32 = 10.0;

/// Pink noise via Paul Kellett's economy filter: six one-pole lowpass stages
/// summed with a direct tap, approximating a -3 dB/octave slope across the
/// audible band.
pub fn pink_buffer(duration_secs: f32, sample_rate: f32, rng: &mut SmallRng) -> Vec<f32> {
    let frames = (duration_secs * sample_rate) as usize;
    let mut out = Vec::with_capacity(frames);

    let (mut b0, mut b1, mut b2, mut b3, mut b4, mut b5, mut b6) =
        (0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32, 0.0f32);

    for _ in 0..frames {
        let white: f32 = rng.gen_range(-1.0..1.0);
        b0 = 0.99886 * b0 + white * 0.0555179;
        b1 = 0.99332 * b1 + white * 0.0750759;
        b2 = 0.96900 * b2 + white * 0.1538520;
        b3 = 0.86650 * b3 + white * 0.3104856;
        b4 = 0.55000 * b4 + white * 0.5329522;
        b5 = -0.7616 * b5 - white * 0.0168980;
        let pink = (b0 + b1 + b2 + b3 + b4 + b5 + b6 + white * 0.5362) * 0.11;
        b6 = white * 0.115926;
        out.push(pink);
    }

    out
}

/// Brown noise as a leaky integrator over white noise. The 3.5x makeup gain
/// compensates for the energy lost to the integration.
pub fn brown_buffer(duration_secs: f32, sample_rate: f32, rng: &mut SmallRng) -> Vec<f32> {
    let frames = (duration_secs * sample_rate) as usize;
    let mut out = Vec::with_capacity(frames);

    let mut last = 0.0f32;
    for _ in 0..frames {
        let white: f32 = rng.gen_range(-1.0..1.0);
        let brown = (last + 0.02 * white) / 1.02;
        last = brown;
        out.push(brown * 3.5);
    }

    out
}

/// Replays a pre-rendered buffer forever, wrapping at the end.
#[derive(Debug, Clone)]
pub struct LoopingBuffer {
    samples: Vec<f32>,
    position: usize,
}

impl LoopingBuffer {
    pub fn new(samples: Vec<f32>) -> Self {
        debug_assert!(!samples.is_empty());
        Self {
            samples,
            position: 0,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.samples[self.position];
        self.position += 1;
        if self.position == self.samples.len() {
            self.position = 0;
        }
        sample
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
