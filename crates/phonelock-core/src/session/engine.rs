//! Lock-screen session engine.
//!
//! The engine is a wall-clock-based state machine. It does not use
//! internal threads - the host loop injects `now` and calls `tick()`
//! periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Locked -> Scanning -> Unlocked -> Locked
//! ```
//!
//! A forced lock during Scanning aborts the capture and returns to Locked.
//! Any other transition request is a silent no-op.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = LockSessionEngine::new(config, audio, camera, Utc::now());
//! engine.request_unlock(Utc::now());
//! // In a loop:
//! engine.tick(Utc::now()); // Returns events as deadlines elapse
//! ```

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioOutputFactory, ChimeSynth};
use crate::catalog::{builtin_catalog, AppProfile};
use crate::config::Config;
use crate::events::Event;
use crate::notification::{self, NotificationLog};
use crate::session::capture::{CameraProvider, CaptureGate, CapturePoll};
use crate::session::scheduler::NotificationScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Locked,
    Scanning,
    Unlocked,
}

/// The session engine composing scheduler, generator, chime synthesizer
/// and capture gate. The only component with externally observable
/// transitions; all session mutation runs through its methods.
pub struct LockSessionEngine {
    state: SessionState,
    config: Config,
    catalog: Vec<AppProfile>,
    log: NotificationLog,
    scheduler: NotificationScheduler,
    gate: CaptureGate,
    chime: ChimeSynth,
    camera: Box<dyn CameraProvider>,
    rng: Mcg128Xsl64,
}

impl LockSessionEngine {
    /// Create an engine in the `Locked` state with the scheduler armed.
    pub fn new(
        config: Config,
        audio: Box<dyn AudioOutputFactory>,
        camera: Box<dyn CameraProvider>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::build(config, audio, camera, Mcg128Xsl64::from_entropy(), now)
    }

    /// Like [`new`](Self::new), with deterministic entropy.
    pub fn with_seed(
        config: Config,
        audio: Box<dyn AudioOutputFactory>,
        camera: Box<dyn CameraProvider>,
        seed: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self::build(config, audio, camera, Mcg128Xsl64::seed_from_u64(seed), now)
    }

    /// Replace the built-in app catalog.
    pub fn with_catalog(mut self, catalog: Vec<AppProfile>) -> Self {
        self.catalog = catalog;
        self
    }

    fn build(
        config: Config,
        audio: Box<dyn AudioOutputFactory>,
        camera: Box<dyn CameraProvider>,
        mut rng: Mcg128Xsl64,
        now: DateTime<Utc>,
    ) -> Self {
        let mut scheduler = NotificationScheduler::new(
            config.notifications.min_delay_ms,
            config.notifications.max_delay_ms,
        );
        scheduler.arm(now, &mut rng);
        let log = NotificationLog::with_capacity(config.notifications.capacity);
        let gate = CaptureGate::new(config.capture.clone());
        let chime = ChimeSynth::new(config.chime.clone(), audio);
        Self {
            state: SessionState::Locked,
            catalog: builtin_catalog(),
            log,
            scheduler,
            gate,
            chime,
            camera,
            rng,
            config,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.log
    }

    pub fn audio_enabled(&self) -> bool {
        self.chime.enabled()
    }

    pub fn scheduler_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    pub fn capture_active(&self) -> bool {
        self.gate.is_active()
    }

    pub fn camera_active(&self) -> bool {
        self.gate.camera_active()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state,
            notification_count: self.log.len(),
            audio_enabled: self.chime.enabled(),
            camera_active: self.gate.camera_active(),
            scheduler_armed: self.scheduler.is_armed(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the capture sequence. No-op unless currently Locked.
    ///
    /// The first interaction also activates the audio preference, the way
    /// tapping a phone unmutes it.
    pub fn request_unlock(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != SessionState::Locked {
            return None;
        }
        self.chime.set_enabled(true);
        self.scheduler.cancel();
        let camera_acquired = self.gate.begin(now, self.camera.as_mut());
        self.state = SessionState::Scanning;
        tracing::debug!(camera_acquired, "scan started");
        Some(Event::ScanStarted {
            camera_acquired,
            at: now,
        })
    }

    /// Return to Locked. No-op while already Locked; while Scanning this is
    /// the forced interruption path: the capture gate is cancelled and a
    /// fresh scheduler chain starts.
    pub fn request_lock(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            SessionState::Unlocked => {
                self.state = SessionState::Locked;
                self.scheduler.arm(now, &mut self.rng);
                tracing::debug!("session locked");
                Some(Event::SessionLocked { at: now })
            }
            SessionState::Scanning => {
                self.gate.cancel();
                self.state = SessionState::Locked;
                self.scheduler.arm(now, &mut self.rng);
                tracing::debug!("scan cancelled by forced lock");
                Some(Event::ScanCancelled { at: now })
            }
            SessionState::Locked => None,
        }
    }

    /// Set the audio preference. Unchanged preference is a no-op.
    ///
    /// Enabling while Locked with banners already showing plays an
    /// immediate confirmation chime.
    pub fn set_audio_enabled(&mut self, enabled: bool, now: DateTime<Utc>) -> Vec<Event> {
        if enabled == self.chime.enabled() {
            return Vec::new();
        }
        self.chime.set_enabled(enabled);
        let mut events = vec![Event::AudioPreferenceChanged { enabled, at: now }];
        if enabled && self.state == SessionState::Locked && !self.log.is_empty() {
            if let Some(freq_hz) = self.chime.emit(&mut self.rng) {
                events.push(Event::ChimeEmitted { freq_hz, at: now });
            }
        }
        events
    }

    /// Flip the audio preference.
    pub fn toggle_audio(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.set_audio_enabled(!self.chime.enabled(), now)
    }

    /// Advance deadlines. Call periodically from the host loop; returns the
    /// events produced by any deadline that elapsed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        match self.state {
            SessionState::Locked => {
                if self.scheduler.poll(now) {
                    if let Some(record) = notification::generate(
                        &self.catalog,
                        self.config.notifications.group_probability,
                        now,
                        &mut self.rng,
                    ) {
                        self.log.push(record.clone());
                        events.push(Event::NotificationPosted { record, at: now });
                        if let Some(freq_hz) = self.chime.emit(&mut self.rng) {
                            events.push(Event::ChimeEmitted { freq_hz, at: now });
                        }
                    }
                    self.scheduler.arm(now, &mut self.rng);
                }
            }
            SessionState::Scanning => match self.gate.poll(now) {
                CapturePoll::Detected => events.push(Event::FaceDetected { at: now }),
                CapturePoll::Complete { scan_ms } => {
                    self.log.clear();
                    self.scheduler.cancel();
                    self.state = SessionState::Unlocked;
                    tracing::debug!(scan_ms, "session unlocked");
                    events.push(Event::SessionUnlocked { scan_ms, at: now });
                }
                CapturePoll::Idle | CapturePoll::Pending => {}
            },
            SessionState::Unlocked => {}
        }
        events
    }
}
