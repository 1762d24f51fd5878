//! Procedural soundscape beds.
//!
//! A bed is an endless looping texture: a noise source colored by a slowly
//! modulated lowpass, plus a faint sub-register tone underneath. Beds are
//! built on the control thread and rendered by the mixer until told to fade
//! out; the fade itself happens on the audio thread by reshaping the bed's
//! gain lane in place.

/// Start/stop/swap policy for the single live bed.
pub mod control;

pub use control::{AmbientAction, AmbientControl, RESTART_GAP};

use rand::rngs::SmallRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::automation::ParamLane;
use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    filter::{FilterNode, FilterParam},
    lfo::LfoNode,
    noise::NoiseNode,
    node::{RenderCtx, SignalNode},
    tone::ToneNode,
};

/// Gain a bed starts from. Exponential fades cannot start at zero.
const FADE_IN_FLOOR: f32 = 0.0001;
/// Seconds to glide from the floor up to the resting level.
const FADE_IN_SECS: f64 = 2.0;
/// Resting bed level.
const BED_GAIN: f32 = 0.6;
/// Seconds for the stop fade.
const FADE_OUT_SECS: f64 = 0.1;
/// Seconds after the stop fade begins until the bed can be dropped. Twice
/// the fade, so the ramp has fully landed before the voice disappears.
const DROP_AFTER_SECS: f64 = 0.2;

/// The two soundscape characters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientTimbre {
    /// Brown-noise rumble under a 200 Hz lowpass, 45 Hz sine sub.
    Deep,
    /// Pink noise through a resonant 120 Hz lowpass, 38 Hz triangle sub.
    Trench,
}

impl Default for AmbientTimbre {
    fn default() -> Self {
        AmbientTimbre::Deep
    }
}

/// A live soundscape: graph, master gain lane, and fade-out bookkeeping.
pub struct AmbientBed {
    graph: Box<dyn SignalNode>,
    gain: ParamLane,
    timbre: AmbientTimbre,
    sample_rate: f32,
    elapsed_samples: u64,
    drop_at: Option<f64>,
}

impl AmbientBed {
    pub fn build(timbre: AmbientTimbre, sample_rate: f32, rng: &mut SmallRng) -> Self {
        let graph: Box<dyn SignalNode> = match timbre {
            AmbientTimbre::Deep => {
                let rumble = NoiseNode::brown(sample_rate, rng).through(
                    FilterNode::lowpass(200.0)
                        .modulate(LfoNode::sine(0.08), FilterParam::Cutoff, 60.0),
                );
                let sub =
                    ToneNode::sine(ParamLane::constant(45.0)).amplify(EnvNode::constant(0.15));
                Box::new(rumble.blend(sub))
            }
            AmbientTimbre::Trench => {
                let rumble = NoiseNode::pink(sample_rate, rng).through(
                    FilterNode::lowpass(120.0)
                        .with_q(3.0)
                        .modulate(LfoNode::sine(0.05), FilterParam::Cutoff, 30.0),
                );
                let sub = ToneNode::triangle(ParamLane::constant(38.0))
                    .amplify(EnvNode::constant(0.12));
                Box::new(rumble.blend(sub))
            }
        };

        Self {
            graph,
            gain: ParamLane::new(FADE_IN_FLOOR).exp_to(FADE_IN_SECS, BED_GAIN),
            timbre,
            sample_rate,
            elapsed_samples: 0,
            drop_at: None,
        }
    }

    pub fn timbre(&self) -> AmbientTimbre {
        self.timbre
    }

    fn elapsed_secs(&self) -> f64 {
        self.elapsed_samples as f64 / self.sample_rate as f64
    }

    /// Render one block and ADD it into `out`, using `scratch` (same length
    /// as `out`) for the dry graph signal.
    pub fn render_into(&mut self, out: &mut [f32], scratch: &mut [f32]) {
        debug_assert_eq!(out.len(), scratch.len());

        let ctx = RenderCtx::new(self.sample_rate, self.elapsed_secs());
        self.graph.render(scratch, &ctx);

        for (i, (o, s)) in out.iter_mut().zip(scratch.iter()).enumerate() {
            let g = self.gain.sample(ctx.sample_time(i));
            *o += *s * g;
        }

        self.elapsed_samples += out.len() as u64;
    }

    /// Reshape the gain lane into a short fade to silence, starting now.
    ///
    /// Anchoring first means a bed still in its fade-in glides down from
    /// wherever the fade-in had reached, with no level jump.
    pub fn begin_fade_out(&mut self) {
        if self.drop_at.is_some() {
            return;
        }
        let now = self.elapsed_secs();
        self.gain.anchor(now);
        self.gain.ramp_linear(now + FADE_OUT_SECS, 0.0);
        self.drop_at = Some(now + DROP_AFTER_SECS);
    }

    pub fn is_fading_out(&self) -> bool {
        self.drop_at.is_some()
    }

    /// True once the fade has landed and the bed can be discarded.
    pub fn finished(&self) -> bool {
        self.drop_at.map_or(false, |t| self.elapsed_secs() >= t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const SAMPLE_RATE: f32 = 8_000.0;

    fn render_secs(bed: &mut AmbientBed, secs: f64) -> Vec<f32> {
        let frames = (secs * SAMPLE_RATE as f64) as usize;
        let mut out = vec![0.0f32; frames];
        let mut scratch = vec![0.0f32; 256];
        for chunk in out.chunks_mut(256) {
            bed.render_into(chunk, &mut scratch[..chunk.len()]);
        }
        out
    }

    fn rms(window: &[f32]) -> f32 {
        (window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32).sqrt()
    }

    #[test]
    fn bed_fades_in_over_two_seconds() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut bed = AmbientBed::build(AmbientTimbre::Deep, SAMPLE_RATE, &mut rng);
        let samples = render_secs(&mut bed, 2.5);

        let early = rms(&samples[..4_000]); // first half second
        let settled = rms(&samples[16_000..]); // past the fade-in
        assert!(
            settled > early * 4.0,
            "fade-in should grow the bed: early={early}, settled={settled}"
        );
    }

    #[test]
    fn fade_out_lands_at_silence_and_finishes() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut bed = AmbientBed::build(AmbientTimbre::Trench, SAMPLE_RATE, &mut rng);
        render_secs(&mut bed, 3.0);

        bed.begin_fade_out();
        assert!(bed.is_fading_out());
        assert!(!bed.finished());

        let fade = render_secs(&mut bed, 0.25);
        // Past the 100 ms ramp the bed contributes nothing.
        let tail = rms(&fade[1_200..]);
        assert!(tail < 1e-4, "bed still audible after fade: {tail}");
        assert!(bed.finished());
    }

    #[test]
    fn fade_out_is_idempotent() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut bed = AmbientBed::build(AmbientTimbre::Deep, SAMPLE_RATE, &mut rng);
        render_secs(&mut bed, 1.0);

        bed.begin_fade_out();
        let first_deadline = bed.drop_at;
        render_secs(&mut bed, 0.05);
        bed.begin_fade_out();
        assert_eq!(bed.drop_at, first_deadline);
    }

    #[test]
    fn timbres_produce_different_textures() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut deep = AmbientBed::build(AmbientTimbre::Deep, SAMPLE_RATE, &mut rng);
        let mut trench = AmbientBed::build(AmbientTimbre::Trench, SAMPLE_RATE, &mut rng);

        let a = render_secs(&mut deep, 1.0);
        let b = render_secs(&mut trench, 1.0);
        assert!(a != b);
        assert!(rms(&a[4_000..]) > 0.0);
        assert!(rms(&b[4_000..]) > 0.0);
    }
}
