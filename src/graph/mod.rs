//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with the ergonomics needed
//! for voice design: automation-driven parameters, modulation, and
//! block-based rendering. The `extensions` module adds fluent helpers so
//! voices can be authored with a clear, chainable API.

/// Multiply two signals together (amplitude control).
pub mod amplify;
/// Parallel layering of two graphs (summing junction).
pub mod blend;
/// Feedback echo effect.
pub mod echo;
/// Automation lane rendered as a control signal.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.blend()`, etc.).
pub mod extensions;
/// Lowpass filter node with sweepable, modulatable cutoff.
pub mod filter;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Connect modulation sources to node parameters.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Looping noise sources.
pub mod noise;
/// Serial chaining of two nodes (source -> effect).
pub mod through;
/// Oscillator with automation-driven frequency.
pub mod tone;

pub use extensions::NodeExt;
pub use node::{Modulatable, RenderCtx, SignalNode};
