//! cpal-backed implementation of the core audio output capability.
//!
//! Rendered chime buffers are pushed into a shared queue that the output
//! stream callback drains; the callback emits silence when the queue runs
//! dry. Acquisition failures degrade to an absent capability.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};

use phonelock_core::{AudioOutput, AudioOutputFactory};

#[derive(Debug, thiserror::Error)]
enum OutputError {
    #[error("no default output device")]
    NoDevice,
    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
    #[error("config error: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("build stream error: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("play error: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Factory acquiring the host's default output device.
#[derive(Debug, Default)]
pub struct CpalAudio;

impl AudioOutputFactory for CpalAudio {
    fn acquire(&mut self) -> Option<Box<dyn AudioOutput>> {
        match CpalOutput::open() {
            Ok(out) => Some(Box::new(out)),
            Err(err) => {
                tracing::warn!(%err, "audio output unavailable");
                None
            }
        }
    }
}

type SampleQueue = Arc<Mutex<VecDeque<f32>>>;

pub struct CpalOutput {
    stream: Stream,
    queue: SampleQueue,
    sample_rate: u32,
}

impl CpalOutput {
    fn open() -> Result<Self, OutputError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(OutputError::NoDevice)?;
        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        let queue: SampleQueue = Arc::new(Mutex::new(VecDeque::new()));

        let stream = match config.sample_format() {
            SampleFormat::F32 => {
                let queue = queue.clone();
                device.build_output_stream(
                    &config.into(),
                    move |data: &mut [f32], _| {
                        let mut queue = match queue.lock() {
                            Ok(queue) => queue,
                            Err(_) => return,
                        };
                        for frame in data.chunks_mut(channels) {
                            let sample = queue.pop_front().unwrap_or(0.0);
                            for out in frame {
                                *out = sample;
                            }
                        }
                    },
                    |err| tracing::error!("audio stream error: {}", err),
                    None,
                )?
            }
            SampleFormat::I16 => {
                let queue = queue.clone();
                device.build_output_stream(
                    &config.into(),
                    move |data: &mut [i16], _| {
                        let mut queue = match queue.lock() {
                            Ok(queue) => queue,
                            Err(_) => return,
                        };
                        for frame in data.chunks_mut(channels) {
                            let sample = queue.pop_front().unwrap_or(0.0);
                            let value = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                            for out in frame {
                                *out = value;
                            }
                        }
                    },
                    |err| tracing::error!("audio stream error: {}", err),
                    None,
                )?
            }
            format => return Err(OutputError::UnsupportedFormat(format)),
        };

        stream.play()?;
        Ok(Self {
            stream,
            queue,
            sample_rate,
        })
    }
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn play(&mut self, samples: &[f32]) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.extend(samples.iter().copied());
        }
    }

    fn resume(&mut self) {
        if let Err(err) = self.stream.play() {
            tracing::debug!(%err, "failed to resume audio stream");
        }
    }
}
