//! Random-interval scheduler driving lock-screen notifications.
//!
//! Holds at most one pending deadline. The engine arms it while Locked,
//! cancels it on every exit from Locked, and re-arms with a fresh draw
//! after each firing; a cancelled deadline can never fire.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct NotificationScheduler {
    min_delay_ms: u64,
    max_delay_ms: u64,
    next_due: Option<DateTime<Utc>>,
}

impl NotificationScheduler {
    /// Create a disarmed scheduler with the given delay bounds.
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms,
            next_due: None,
        }
    }

    /// Draw a fresh uniform delay and arm the deadline, replacing any
    /// pending one. Returns the deadline.
    pub fn arm(&mut self, now: DateTime<Utc>, rng: &mut impl Rng) -> DateTime<Utc> {
        let delay_ms = rng.gen_range(self.min_delay_ms..=self.max_delay_ms);
        let due = now + Duration::milliseconds(delay_ms as i64);
        self.next_due = Some(due);
        due
    }

    /// Drop the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.next_due
    }

    /// True when the armed deadline has passed; disarms in that case.
    /// The caller appends a notification and re-arms for the next draw.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn armed_deadline_stays_within_bounds() {
        let mut rng = Mcg128Xsl64::seed_from_u64(11);
        let mut scheduler = NotificationScheduler::new(1000, 2000);
        for _ in 0..50 {
            let due = scheduler.arm(t0(), &mut rng);
            let delay = (due - t0()).num_milliseconds();
            assert!((1000..=2000).contains(&delay), "delay {delay}");
        }
    }

    #[test]
    fn poll_fires_only_at_deadline() {
        let mut rng = Mcg128Xsl64::seed_from_u64(11);
        let mut scheduler = NotificationScheduler::new(500, 500);
        scheduler.arm(t0(), &mut rng);
        assert!(!scheduler.poll(t0()));
        assert!(!scheduler.poll(t0() + Duration::milliseconds(499)));
        assert!(scheduler.poll(t0() + Duration::milliseconds(500)));
        // Fired deadline is consumed.
        assert!(!scheduler.is_armed());
        assert!(!scheduler.poll(t0() + Duration::milliseconds(600)));
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut rng = Mcg128Xsl64::seed_from_u64(11);
        let mut scheduler = NotificationScheduler::new(500, 500);
        scheduler.arm(t0(), &mut rng);
        scheduler.cancel();
        assert!(!scheduler.poll(t0() + Duration::milliseconds(5000)));
    }

    #[test]
    fn rearming_replaces_pending_deadline() {
        let mut rng = Mcg128Xsl64::seed_from_u64(11);
        let mut scheduler = NotificationScheduler::new(500, 500);
        scheduler.arm(t0(), &mut rng);
        let later = t0() + Duration::milliseconds(300);
        let due = scheduler.arm(later, &mut rng);
        assert_eq!(due, later + Duration::milliseconds(500));
        // Only the replacement deadline exists.
        assert!(!scheduler.poll(t0() + Duration::milliseconds(500)));
        assert!(scheduler.poll(due));
    }
}
