//! Output device probing and the realtime stream.
//!
//! The stream callback renders the mixer in mono blocks of at most
//! `MAX_BLOCK_SIZE` frames and fans each sample out to every channel of the
//! device's interleaved buffer. Streams are built paused; the engine is
//! explicitly resumed by the caller.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::engine::mixer::Mixer;
use crate::error::AudioError;
use crate::MAX_BLOCK_SIZE;

/// The default output device and its native configuration.
pub struct OutputDevice {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
}

impl OutputDevice {
    /// Find the default output device and its default config.
    pub fn probe() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let config = device
            .default_output_config()
            .map_err(|err| AudioError::DeviceConfig(err.to_string()))?;
        Ok(Self { device, config })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    pub fn channels(&self) -> usize {
        self.config.channels() as usize
    }

    /// Build the output stream around `mixer` and leave it paused.
    pub fn open_stream(self, mut mixer: Mixer) -> Result<OutputStream, AudioError> {
        if self.config.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::StreamBuild(format!(
                "unsupported sample format {:?}",
                self.config.sample_format()
            )));
        }

        let channels = self.channels();
        let mut mono = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = self
            .device
            .build_output_stream(
                &self.config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut mono[..frames];
                        mixer.render(block);

                        // Mono to interleaved: same sample on every channel.
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }
                        frames_written += frames;
                    }
                },
                |err| tracing::error!(%err, "audio stream error"),
                None,
            )
            .map_err(|err| AudioError::StreamBuild(err.to_string()))?;

        // Freshly built streams may be running depending on the backend;
        // pause so the clock provably starts frozen.
        stream
            .pause()
            .map_err(|err| AudioError::StreamPause(err.to_string()))?;

        Ok(OutputStream { stream })
    }
}

/// A handle keeping the device stream alive. Dropping it stops audio.
pub struct OutputStream {
    stream: cpal::Stream,
}

impl OutputStream {
    pub fn play(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|err| AudioError::StreamPlay(err.to_string()))
    }

    pub fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|err| AudioError::StreamPause(err.to_string()))
    }
}
