use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notification::NotificationRecord;
use crate::session::SessionState;

/// Every observable change in the session produces an Event.
/// The host loop polls `tick()` for events; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The session re-entered the `Locked` state.
    SessionLocked {
        at: DateTime<Utc>,
    },
    /// An unlock request started the capture sequence.
    ScanStarted {
        camera_acquired: bool,
        at: DateTime<Utc>,
    },
    /// Cosmetic marker partway through the dwell window.
    FaceDetected {
        at: DateTime<Utc>,
    },
    /// The dwell elapsed and the session unlocked. Capture resources are
    /// released and the notification log is cleared before this fires.
    SessionUnlocked {
        scan_ms: u64,
        at: DateTime<Utc>,
    },
    /// An in-flight capture was aborted by a forced lock.
    ScanCancelled {
        at: DateTime<Utc>,
    },
    /// A generated notification was appended to the lock-screen log.
    NotificationPosted {
        record: NotificationRecord,
        at: DateTime<Utc>,
    },
    /// A chime was emitted (playback is best effort; the emission is the
    /// observable).
    ChimeEmitted {
        freq_hz: f32,
        at: DateTime<Utc>,
    },
    /// The user toggled the audio preference.
    AudioPreferenceChanged {
        enabled: bool,
        at: DateTime<Utc>,
    },
    /// Full state snapshot for pollers.
    StateSnapshot {
        state: SessionState,
        notification_count: usize,
        audio_enabled: bool,
        camera_active: bool,
        scheduler_armed: bool,
        at: DateTime<Utc>,
    },
}
