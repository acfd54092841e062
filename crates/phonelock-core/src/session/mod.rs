mod capture;
mod engine;
mod scheduler;

pub use capture::{CameraError, CameraProvider, CameraStream, CaptureGate, CapturePoll, NoCamera};
pub use engine::{LockSessionEngine, SessionState};
pub use scheduler::NotificationScheduler;
