//! Delay line and the feedback echo built on top of it.

use crate::dsp::filter::LowPass;

/// Fixed-capacity circular delay line.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// `capacity` is the longest reachable delay, in samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(1)],
            write_pos: 0,
        }
    }

    /// The sample written `delay_samples` writes ago.
    ///
    /// Reads happen before the current write, so the reachable range is
    /// `[1, capacity]`; requests outside it are clamped.
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let capacity = self.buffer.len();
        let delay = delay_samples.clamp(1, capacity);
        let read_pos = (self.write_pos + capacity - delay) % capacity;
        self.buffer[read_pos]
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Plain read-then-write tap.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize) -> f32 {
        let delayed = self.read(delay_samples);
        self.write(sample);
        delayed
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Delay with a damped feedback path, mixed dry + wet.
///
/// The recirculating signal passes through a lowpass each trip, so repeats
/// get both quieter and darker, the way an echo dies out over water.
#[derive(Debug, Clone)]
pub struct FeedbackEcho {
    line: DelayLine,
    damping: LowPass,
    delay_samples: usize,
    feedback: f32,
}

impl FeedbackEcho {
    pub fn new(delay_secs: f32, feedback: f32, damping_hz: f32, sample_rate: f32) -> Self {
        let delay_samples = (delay_secs * sample_rate).round().max(1.0) as usize;
        Self {
            line: DelayLine::new(delay_samples),
            damping: LowPass::new(damping_hz),
            delay_samples,
            // Anything at or past 1.0 recirculates forever.
            feedback: feedback.clamp(0.0, 0.95),
        }
    }

    /// Process the buffer in place, replacing it with dry + delayed signal.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let (k, g) = self.damping.coefficients(sample_rate);

        for sample in buffer.iter_mut() {
            let dry = *sample;
            let delayed = self.line.read(self.delay_samples);
            let recirculated = self.damping.next_sample(delayed, k, g) * self.feedback;
            self.line.write(dry + recirculated);
            *sample = dry + delayed;
        }
    }

    pub fn reset(&mut self) {
        self.line.reset();
        self.damping.reset();
    }
}
