use std::f32::consts::TAU;

/*
Topology-preserving state-variable lowpass, 12 dB/octave.

The two integrator states (ic1eq, ic2eq) are advanced with the trapezoidal
rule, which keeps the filter stable under audio-rate cutoff changes. That
matters here: soundscape beds sweep their cutoff continuously from a slow
LFO, and bubble cues ramp theirs over the life of the voice.

Damping is expressed as Q. Q = 1 is the flat-ish default used by plain
"muffle this" filtering; the trench soundscape runs Q = 3 for a resonant
hump just above its 120 Hz cutoff.
*/

/// Two-pole lowpass with a resonance control.
#[derive(Debug, Clone)]
pub struct LowPass {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
}

impl LowPass {
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: 1.0,
        }
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q.max(0.01);
        self
    }

    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        // Bilinear-transform prewarp so the analog cutoff lands where the
        // digital one should.
        let wd = TAU * self.cutoff_hz;
        let wa = (2.0 * sample_rate) * (wd / (2.0 * sample_rate)).tan();
        wa / (2.0 * sample_rate)
    }

    /// The (k, g) pair `next_sample` consumes, for callers that drive the
    /// filter sample by sample inside their own loop.
    pub fn coefficients(&self, sample_rate: f32) -> (f32, f32) {
        (1.0 / self.q.max(0.01), self.compute_g(sample_rate))
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    /// Filter the buffer in place. Cutoff and Q are read once per call, so
    /// sweeps update at block rate.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let (k, g) = self.coefficients(sample_rate);

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, k, g);
        }
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(0.01);
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Oscillator;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine_block(frequency: f32, frames: usize) -> Vec<f32> {
        let mut osc = Oscillator::sine();
        (0..frames).map(|_| osc.next_sample(frequency, SAMPLE_RATE)).collect()
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(64);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn passes_dc_through() {
        let mut filter = LowPass::new(500.0);
        let mut buffer = vec![1.0; 256];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(buffer[255] > 0.99, "DC should settle at unity, got {}", buffer[255]);
    }

    #[test]
    fn attenuates_far_above_cutoff() {
        let mut filter = LowPass::new(200.0);
        // 4 kHz through a 200 Hz lowpass: well over 4 octaves up, so the
        // 12 dB/octave slope leaves almost nothing.
        let mut buffer = sine_block(4_000.0, 1_024);
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(
            peak_after_transient(&buffer) < 0.02,
            "expected strong attenuation, got {}",
            peak_after_transient(&buffer)
        );
    }

    #[test]
    fn passes_well_below_cutoff() {
        let mut filter = LowPass::new(600.0);
        let mut buffer = sine_block(80.0, 4_096);
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(peak_after_transient(&buffer) > 0.9);
    }

    #[test]
    fn higher_q_boosts_the_cutoff_region() {
        let cutoff = 120.0;

        let mut flat = LowPass::new(cutoff);
        let mut flat_buffer = sine_block(cutoff, 8_192);
        flat.render(&mut flat_buffer, SAMPLE_RATE);
        let flat_peak = peak_after_transient(&flat_buffer);

        let mut resonant = LowPass::new(cutoff).with_q(3.0);
        let mut resonant_buffer = sine_block(cutoff, 8_192);
        resonant.render(&mut resonant_buffer, SAMPLE_RATE);
        let resonant_peak = peak_after_transient(&resonant_buffer);

        assert!(
            resonant_peak > flat_peak * 1.5,
            "Q=3 should hump at cutoff: resonant={resonant_peak}, flat={flat_peak}"
        );
    }

    #[test]
    fn cutoff_sweep_changes_what_gets_through() {
        let probe = 1_000.0;

        let mut filter = LowPass::new(100.0);
        let mut closed = sine_block(probe, 2_048);
        filter.render(&mut closed, SAMPLE_RATE);
        let closed_peak = peak_after_transient(&closed);

        filter.reset();
        filter.set_cutoff(5_000.0);
        let mut open = sine_block(probe, 2_048);
        filter.render(&mut open, SAMPLE_RATE);
        let open_peak = peak_after_transient(&open);

        assert!(
            open_peak > closed_peak * 4.0,
            "open={open_peak}, closed={closed_peak}"
        );
    }

    #[test]
    fn reset_clears_integrator_state() {
        let mut filter = LowPass::new(300.0);
        let mut buffer = vec![1.0; 64];
        filter.render(&mut buffer, SAMPLE_RATE);
        assert!(filter.ic2eq != 0.0);

        filter.reset();
        assert_eq!(filter.ic1eq, 0.0);
        assert_eq!(filter.ic2eq, 0.0);
    }
}
