//! Lock-screen clock text.
//!
//! Pure formatting plus a refresh-cadence tracker. The host injects `now`;
//! the clock never reads the system time itself.

use std::fmt;

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Rendered time/date strings for the lock screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockText {
    /// 12-hour time without a leading zero, e.g. `"2:05"`.
    pub time: String,
    /// Weekday and date, e.g. `"Sunday, March 9"`.
    pub date: String,
}

/// 12-hour `h:MM` time text.
pub fn time_text<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    t.format("%-I:%M").to_string()
}

/// `Weekday, Month D` date text.
pub fn date_text<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    t.format("%A, %B %-d").to_string()
}

/// Re-renders the clock text on a fixed cadence.
#[derive(Debug, Clone)]
pub struct LockClock {
    refresh: Duration,
    last_render_at: Option<DateTime<Utc>>,
    current: Option<ClockText>,
}

impl LockClock {
    pub fn new(refresh_secs: u64) -> Self {
        Self {
            refresh: Duration::seconds(refresh_secs as i64),
            last_render_at: None,
            current: None,
        }
    }

    /// Render fresh text when the refresh cadence has elapsed.
    /// Returns the new text when a render happened, `None` otherwise.
    pub fn tick<Tz: TimeZone>(&mut self, now: DateTime<Tz>) -> Option<&ClockText>
    where
        Tz::Offset: fmt::Display,
    {
        let instant = now.with_timezone(&Utc);
        let due = match self.last_render_at {
            None => true,
            Some(last) => instant - last >= self.refresh,
        };
        if !due {
            return None;
        }
        self.last_render_at = Some(instant);
        self.current = Some(ClockText {
            time: time_text(&now),
            date: date_text(&now),
        });
        self.current.as_ref()
    }

    /// The most recently rendered text, if any.
    pub fn current(&self) -> Option<&ClockText> {
        self.current.as_ref()
    }
}
