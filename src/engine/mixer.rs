//! The audio-thread side of the engine.
/*
    The mixer owns everything that sounds: transient cue voices and the
    ambient bed. It runs inside the output callback, so it follows the
    realtime rules: drain the command ring without blocking, render, add,
    advance the clock. The only allocation-shaped work on this path is
    dropping voices that have finished.

    Scheduling precision comes from sample arithmetic, not timers. A
    PlayVoice command carries an absolute clock time; the mixer converts
    it to a sample index once and starts the voice at exactly that frame,
    even when it falls in the middle of a block. A voice whose start has
    already passed (the control thread stalled) begins at the next frame
    instead, playing its envelope from the top rather than jumping in
    mid-shape.
*/

use rtrb::Consumer;

use crate::ambient::{AmbientBed, AmbientTimbre};
use crate::cues::CueVoice;
use crate::engine::clock::AudioClock;
use crate::engine::tracker::NodeId;
use crate::graph::{RenderCtx, SignalNode};
use crate::MAX_BLOCK_SIZE;

/// Commands the control thread feeds through the ring.
pub enum MixerCommand {
    /// Start `voice` at absolute clock time `at` (seconds).
    PlayVoice {
        id: NodeId,
        at: f64,
        voice: CueVoice,
    },
    /// Force-silence one voice. Unknown ids are ignored; the voice may
    /// have finished naturally an instant earlier.
    StopVoice { id: NodeId },
    /// Install a freshly built bed, fading out any bed already live.
    BuildAmbient(AmbientBed),
    /// Fade out and drop the live bed.
    FadeOutAmbient,
}

/// A scheduled one-shot voice with its position bookkeeping.
struct ActiveVoice {
    id: NodeId,
    start_sample: u64,
    duration_samples: u64,
    /// Frames rendered so far; also the voice-local time base.
    rendered: u64,
    node: Box<dyn SignalNode>,
}

/// Renders and mixes all live sound. Lives on the audio thread.
pub struct Mixer {
    clock: AudioClock,
    commands: Consumer<MixerCommand>,
    voices: Vec<ActiveVoice>,
    ambient: Option<AmbientBed>,
    /// Beds mid-fade-out, kept until their drop deadline.
    draining: Vec<AmbientBed>,
    temp_buffer: Vec<f32>,
    sample_rate: f32,
}

impl Mixer {
    pub fn new(clock: AudioClock, commands: Consumer<MixerCommand>) -> Self {
        let sample_rate = clock.sample_rate() as f32;
        Self {
            clock,
            commands,
            voices: Vec::with_capacity(32),
            ambient: None,
            draining: Vec::with_capacity(2),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            sample_rate,
        }
    }

    /// Render one mono block (at most `MAX_BLOCK_SIZE` frames) and advance
    /// the clock past it.
    pub fn render(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        self.drain_commands();
        out.fill(0.0);

        let block_start = self.clock.now_samples();
        let frames = out.len() as u64;

        // Destructure for simultaneous borrows of voices and scratch.
        let Mixer {
            voices,
            ambient,
            draining,
            temp_buffer,
            sample_rate,
            ..
        } = self;
        let sample_rate = *sample_rate;

        for voice in voices.iter_mut() {
            if voice.rendered == 0 && voice.start_sample >= block_start + frames {
                continue; // not due yet
            }
            let offset = if voice.rendered == 0 {
                voice.start_sample.saturating_sub(block_start) as usize
            } else {
                0
            };
            let remaining = voice.duration_samples - voice.rendered;
            let want = remaining.min(frames - offset as u64) as usize;
            if want == 0 {
                continue;
            }

            let ctx = RenderCtx::new(sample_rate, voice.rendered as f64 / sample_rate as f64);
            let buf = &mut temp_buffer[..want];
            voice.node.render(buf, &ctx);
            for (o, s) in out[offset..offset + want].iter_mut().zip(buf.iter()) {
                *o += *s;
            }
            voice.rendered += want as u64;
        }
        voices.retain(|v| v.rendered < v.duration_samples);

        if let Some(bed) = ambient.as_mut() {
            bed.render_into(out, &mut temp_buffer[..out.len()]);
        }
        for bed in draining.iter_mut() {
            bed.render_into(out, &mut temp_buffer[..out.len()]);
        }
        draining.retain(|bed| !bed.finished());

        self.clock.advance(frames);
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.commands.pop() {
            match cmd {
                MixerCommand::PlayVoice { id, at, voice } => {
                    let start_sample = (at * self.sample_rate as f64).round() as u64;
                    let duration_samples =
                        (voice.duration_secs * self.sample_rate as f64).round() as u64;
                    self.voices.push(ActiveVoice {
                        id,
                        start_sample,
                        duration_samples,
                        rendered: 0,
                        node: voice.node,
                    });
                }
                MixerCommand::StopVoice { id } => {
                    self.voices.retain(|v| v.id != id);
                }
                MixerCommand::BuildAmbient(bed) => {
                    if let Some(mut old) = self.ambient.take() {
                        old.begin_fade_out();
                        self.draining.push(old);
                    }
                    self.ambient = Some(bed);
                }
                MixerCommand::FadeOutAmbient => {
                    if let Some(mut bed) = self.ambient.take() {
                        bed.begin_fade_out();
                        self.draining.push(bed);
                    }
                }
            }
        }
    }

    /// Number of transient voices alive (scheduled or sounding).
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn has_voice(&self, id: NodeId) -> bool {
        self.voices.iter().any(|v| v.id == id)
    }

    /// Timbre of the live bed, if one is installed.
    pub fn ambient_timbre(&self) -> Option<AmbientTimbre> {
        self.ambient.as_ref().map(|bed| bed.timbre())
    }

    /// Beds still fading toward their drop deadline.
    pub fn draining_beds(&self) -> usize {
        self.draining.len()
    }
}
