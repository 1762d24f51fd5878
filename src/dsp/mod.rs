//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free after construction and realtime-safe,
//! making them safe to embed directly inside voice structs. They intentionally
//! stay focused on the signal-processing math so graph combinators can layer
//! on orchestration and modulation.

/// Scheduled parameter automation (set/ramp/cancel).
pub mod automation;
/// Time-domain delay line and feedback echo.
pub mod delay;
/// Topology-preserving lowpass filter.
pub mod filter;
/// Looping pink and brown noise beds.
pub mod noise;
/// Band-limited-enough oscillator waveforms for low-register work.
pub mod oscillator;

pub use automation::ParamLane;
pub use oscillator::Waveform;
