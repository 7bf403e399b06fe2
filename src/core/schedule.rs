//! Fixed-interval timers driven by the UI loop.
//!
//! A timer re-arms itself every time it fires, whatever its tick did, so
//! polling never stops once the panel is running.

use std::time::{Duration, Instant};

pub const FEEDBACK_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    FeedbackPoll,
    KeepAlive,
}

#[derive(Debug, Clone)]
pub struct Timer {
    period: Duration,
    next_due: Instant,
}

impl Timer {
    /// First expiry is one period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Returns true and re-arms for `now + period` when expired.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }
}

#[derive(Debug, Clone)]
pub struct Schedule {
    feedback: Timer,
    keep_alive: Timer,
}

impl Schedule {
    pub fn start(now: Instant) -> Self {
        Self {
            feedback: Timer::new(FEEDBACK_POLL_INTERVAL, now),
            keep_alive: Timer::new(KEEP_ALIVE_INTERVAL, now),
        }
    }

    /// Timers that expired at `now`, already re-armed.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerKind> {
        let mut due = Vec::with_capacity(2);
        if self.feedback.fire_if_due(now) {
            due.push(TimerKind::FeedbackPoll);
        }
        if self.keep_alive.fire_if_due(now) {
            due.push(TimerKind::KeepAlive);
        }
        due
    }

    pub fn next_deadline(&self) -> Instant {
        self.feedback.next_due().min(self.keep_alive.next_due())
    }

    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_deadline().saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_rearms_relative_to_fire_time() {
        let t0 = Instant::now();
        let mut timer = Timer::new(Duration::from_millis(100), t0);
        assert!(!timer.fire_if_due(t0 + Duration::from_millis(99)));
        assert!(timer.fire_if_due(t0 + Duration::from_millis(150)));
        assert_eq!(timer.next_due(), t0 + Duration::from_millis(250));
        assert!(!timer.fire_if_due(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn late_loop_fires_once_not_in_a_burst() {
        let t0 = Instant::now();
        let mut timer = Timer::new(Duration::from_millis(100), t0);
        let late = t0 + Duration::from_secs(5);
        assert!(timer.fire_if_due(late));
        assert!(!timer.fire_if_due(late));
    }

    #[test]
    fn schedule_interleaves_poll_and_keep_alive() {
        let t0 = Instant::now();
        let mut schedule = Schedule::start(t0);
        assert_eq!(schedule.next_deadline(), t0 + FEEDBACK_POLL_INTERVAL);

        let mut fired = Vec::new();
        for second in 1..=6 {
            fired.extend(schedule.take_due(t0 + Duration::from_secs(second)));
        }
        let polls = fired
            .iter()
            .filter(|k| **k == TimerKind::FeedbackPoll)
            .count();
        let pings = fired.iter().filter(|k| **k == TimerKind::KeepAlive).count();
        assert_eq!(polls, 6);
        assert_eq!(pings, 2);
        assert_eq!(
            schedule.time_until_next(t0 + Duration::from_millis(6500)),
            Duration::from_millis(500)
        );
    }
}
