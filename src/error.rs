//! Error types for engine construction and stream control.

use thiserror::Error;

/// Errors surfaced while opening or controlling the output device.
///
/// Everything past `connect()` is fire-and-forget messaging between
/// threads, so only device and stream operations can fail. `ControllerGone`
/// covers the one messaging failure: the control thread has exited and can
/// no longer receive commands.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("failed to query output device config: {0}")]
    DeviceConfig(String),

    #[error("failed to build audio stream: {0}")]
    StreamBuild(String),

    #[error("failed to start audio stream: {0}")]
    StreamPlay(String),

    #[error("failed to pause audio stream: {0}")]
    StreamPause(String),

    #[error("engine control thread is no longer running")]
    ControllerGone,
}
