//! The permissive biometric capture gate and the camera capability seam.
//!
//! The gate acquires a camera stream best-effort, then unconditionally
//! completes after a fixed dwell. The captured input is never evaluated.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::config::CaptureConfig;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("no camera capability")]
    Unavailable,
    #[error("camera permission denied")]
    Denied,
}

/// A live camera-style stream.
pub trait CameraStream {
    /// Stop the underlying device. The gate calls this exactly once before
    /// dropping the handle.
    fn stop(&mut self) {}
}

/// Host-supplied camera capability.
pub trait CameraProvider {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// Provider for hosts without a camera.
#[derive(Debug, Default)]
pub struct NoCamera;

impl CameraProvider for NoCamera {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
        Err(CameraError::Unavailable)
    }
}

struct Inflight {
    started_at: DateTime<Utc>,
    detect_at: DateTime<Utc>,
    complete_at: DateTime<Utc>,
    detected: bool,
    camera: Option<Box<dyn CameraStream>>,
}

impl Inflight {
    fn release_camera(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            camera.stop();
        }
    }
}

/// Outcome of polling the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePoll {
    /// No capture in flight.
    Idle,
    /// Dwell timer still running.
    Pending,
    /// The cosmetic face-detected marker fired.
    Detected,
    /// Dwell elapsed; capture resources have been released.
    Complete { scan_ms: u64 },
}

/// Simulated biometric check. Always succeeds after the dwell.
pub struct CaptureGate {
    config: CaptureConfig,
    inflight: Option<Inflight>,
}

impl CaptureGate {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            inflight: None,
        }
    }

    /// Begin a capture, replacing any previous one. Camera acquisition is
    /// best effort; denial and absence both fall back to the short dwell.
    /// Returns whether a camera stream was obtained.
    pub fn begin(&mut self, now: DateTime<Utc>, camera: &mut dyn CameraProvider) -> bool {
        self.cancel();
        let stream = match camera.open() {
            Ok(stream) => Some(stream),
            Err(err) => {
                tracing::debug!(%err, "camera unavailable, using short dwell");
                None
            }
        };
        let acquired = stream.is_some();
        let dwell_ms = if acquired {
            self.config.dwell_camera_ms
        } else {
            self.config.dwell_no_camera_ms
        };
        self.inflight = Some(Inflight {
            started_at: now,
            detect_at: now + Duration::milliseconds(self.config.detect_ms as i64),
            complete_at: now + Duration::milliseconds(dwell_ms as i64),
            detected: false,
            camera: stream,
        });
        acquired
    }

    /// Advance the dwell timer. Completion consumes the in-flight record
    /// and releases the camera before returning.
    pub fn poll(&mut self, now: DateTime<Utc>) -> CapturePoll {
        let Some(inflight) = &mut self.inflight else {
            return CapturePoll::Idle;
        };
        if now >= inflight.complete_at {
            let mut inflight = self.inflight.take().expect("in-flight capture present");
            inflight.release_camera();
            let scan_ms = (inflight.complete_at - inflight.started_at).num_milliseconds() as u64;
            return CapturePoll::Complete { scan_ms };
        }
        if !inflight.detected && now >= inflight.detect_at {
            inflight.detected = true;
            return CapturePoll::Detected;
        }
        CapturePoll::Pending
    }

    /// Abort any in-flight capture, releasing the camera and the dwell
    /// deadline in one step. A cancelled capture can never complete.
    pub fn cancel(&mut self) {
        if let Some(mut inflight) = self.inflight.take() {
            inflight.release_camera();
        }
    }

    pub fn is_active(&self) -> bool {
        self.inflight.is_some()
    }

    pub fn camera_active(&self) -> bool {
        self.inflight
            .as_ref()
            .map(|i| i.camera.is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::TimeZone;

    struct FakeStream {
        live: Rc<Cell<u32>>,
        stopped: bool,
    }

    impl CameraStream for FakeStream {
        fn stop(&mut self) {
            assert!(!self.stopped, "stream stopped twice");
            self.stopped = true;
            self.live.set(self.live.get() - 1);
        }
    }

    struct FakeCamera {
        granted: bool,
        live: Rc<Cell<u32>>,
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

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn gate() -> CaptureGate {
        CaptureGate::new(CaptureConfig::default())
    }

    #[test]
    fn camera_path_uses_long_dwell_and_detect_marker() {
        let live = Rc::new(Cell::new(0));
        let mut camera = FakeCamera {
            granted: true,
            live: live.clone(),
        };
        let mut gate = gate();
        assert!(gate.begin(t0(), &mut camera));
        assert!(gate.camera_active());

        assert_eq!(gate.poll(t0() + Duration::milliseconds(500)), CapturePoll::Pending);
        assert_eq!(gate.poll(t0() + Duration::milliseconds(950)), CapturePoll::Detected);
        // Marker fires once.
        assert_eq!(gate.poll(t0() + Duration::milliseconds(1000)), CapturePoll::Pending);
        assert_eq!(
            gate.poll(t0() + Duration::milliseconds(1500)),
            CapturePoll::Complete { scan_ms: 1500 }
        );
        assert_eq!(live.get(), 0, "camera released on completion");
        assert_eq!(gate.poll(t0() + Duration::milliseconds(2000)), CapturePoll::Idle);
    }

    #[test]
    fn denied_camera_uses_short_dwell() {
        let mut camera = FakeCamera {
            granted: false,
            live: Rc::new(Cell::new(0)),
        };
        let mut gate = gate();
        assert!(!gate.begin(t0(), &mut camera));
        assert!(!gate.camera_active());
        assert_eq!(
            gate.poll(t0() + Duration::milliseconds(900)),
            CapturePoll::Complete { scan_ms: 900 }
        );
    }

    #[test]
    fn absent_camera_behaves_like_denied() {
        let mut gate = gate();
        assert!(!gate.begin(t0(), &mut NoCamera));
        assert_eq!(
            gate.poll(t0() + Duration::milliseconds(900)),
            CapturePoll::Complete { scan_ms: 900 }
        );
    }

    #[test]
    fn cancel_releases_camera_and_blocks_completion() {
        let live = Rc::new(Cell::new(0));
        let mut camera = FakeCamera {
            granted: true,
            live: live.clone(),
        };
        let mut gate = gate();
        gate.begin(t0(), &mut camera);
        gate.cancel();
        assert_eq!(live.get(), 0, "camera released on cancel");
        assert!(!gate.is_active());
        // A cancelled dwell timer never fires.
        assert_eq!(gate.poll(t0() + Duration::milliseconds(10_000)), CapturePoll::Idle);
    }

    #[test]
    fn short_dwell_skips_detect_marker() {
        // detect_ms equals the no-camera dwell, so completion supersedes
        // the marker.
        let mut gate = gate();
        gate.begin(t0(), &mut NoCamera);
        assert!(matches!(
            gate.poll(t0() + Duration::milliseconds(900)),
            CapturePoll::Complete { .. }
        ));
    }
}
