//! Shared fakes and fixtures for the session integration tests.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};
use phonelock_core::session::CameraError;
use phonelock_core::{
    AudioOutput, AudioOutputFactory, CameraProvider, CameraStream, Config, LockSessionEngine,
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Audio factory whose outputs count every played buffer.
pub struct RecordingAudio {
    pub plays: Rc<Cell<usize>>,
}

impl RecordingAudio {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let plays = Rc::new(Cell::new(0));
        (
            Self {
                plays: plays.clone(),
            },
            plays,
        )
    }
}

impl AudioOutputFactory for RecordingAudio {
    fn acquire(&mut self) -> Option<Box<dyn AudioOutput>> {
        Some(Box::new(RecordingOutput {
            plays: self.plays.clone(),
        }))
    }
}

struct RecordingOutput {
    plays: Rc<Cell<usize>>,
}

impl AudioOutput for RecordingOutput {
    fn sample_rate(&self) -> u32 {
        48_000
    }

    fn play(&mut self, samples: &[f32]) {
        assert!(!samples.is_empty());
        self.plays.set(self.plays.get() + 1);
    }
}

/// Camera provider tracking how many streams are currently live.
pub struct FakeCamera {
    pub granted: bool,
    pub live: Rc<Cell<u32>>,
}

impl FakeCamera {
    pub fn granted() -> (Self, Rc<Cell<u32>>) {
        let live = Rc::new(Cell::new(0));
        (
            Self {
                granted: true,
                live: live.clone(),
            },
            live,
        )
    }
}

impl CameraProvider for FakeCamera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
        if !self.granted {
            return Err(CameraError::Denied);
        }
        self.live.set(self.live.get() + 1);
        Ok(Box::new(FakeStream {
            live: self.live.clone(),
            stopped: false,
        }))
    }
}

struct FakeStream {
    live: Rc<Cell<u32>>,
    stopped: bool,
}

impl CameraStream for FakeStream {
    fn stop(&mut self) {
        assert!(!self.stopped, "camera stream stopped twice");
        self.stopped = true;
        self.live.set(self.live.get() - 1);
    }
}

/// Engine with a seeded RNG, a recording audio sink and a granted camera.
pub fn engine_with_camera(config: Config, seed: u64) -> (LockSessionEngine, Rc<Cell<u32>>, Rc<Cell<usize>>) {
    let (audio, plays) = RecordingAudio::new();
    let (camera, live) = FakeCamera::granted();
    let engine =
        LockSessionEngine::with_seed(config, Box::new(audio), Box::new(camera), seed, t0());
    (engine, live, plays)
}
