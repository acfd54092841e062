//! # phonelock Core Library
//!
//! This library provides the core logic for phonelock, a phone lock-screen
//! simulator. It implements a CLI-first philosophy where the full session
//! engine lives here, with the terminal front end being a thin host layer
//! over the same core library.
//!
//! ## Architecture
//!
//! - **Session engine**: A wall-clock-based state machine
//!   (Locked/Scanning/Unlocked) that requires the host to periodically
//!   invoke `tick()` with the current time
//! - **Notifications**: A pure generator over a fixed app catalog, feeding
//!   a bounded most-recent-first log
//! - **Audio**: Chime synthesis over a host-supplied output capability,
//!   degrading to a no-op when the host has none
//! - **Capture**: A permissive biometric gate over a host-supplied camera
//!   capability; the capture always succeeds after a fixed dwell
//!
//! ## Key Components
//!
//! - [`LockSessionEngine`]: Core session state machine
//! - [`NotificationLog`] / [`notification::generate`]: Lock-screen banners
//! - [`ChimeSynth`]: Notification chime synthesizer
//! - [`CaptureGate`]: Simulated Face-ID gate
//! - [`Config`]: TOML-backed configuration

pub mod audio;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod notification;
pub mod session;

pub use audio::{AudioOutput, AudioOutputFactory, ChimeSynth, NullAudio};
pub use catalog::{builtin_catalog, AppProfile};
pub use clock::{ClockText, LockClock};
pub use config::Config;
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use notification::{NotificationLog, NotificationRecord};
pub use session::{
    CameraError, CameraProvider, CameraStream, CaptureGate, LockSessionEngine, NoCamera,
    SessionState,
};
