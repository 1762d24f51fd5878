pub mod ambient; // Procedural soundscape beds
pub mod cues; // Breath cue voices
pub mod dsp;
pub mod engine; // Device clock, mixer, scheduling
pub mod error;
pub mod graph; // Composable audio graph nodes

pub use engine::{AudioEngine, ClockState, EngineConfig};
pub use error::AudioError;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f64 = 1.0 / 48_000.0;
