//! Pausable fixed-interval tick timer.

use std::time::{Duration, Instant};

/// Cancellable periodic timer with phase-preserving pause/resume.
///
/// All time enters through caller-supplied [`Instant`]s; the timer never
/// reads the clock itself, so scheduling behavior is fully deterministic
/// under test. Pausing records how much of the current interval is still
/// unserved, and resuming re-arms with exactly that remainder: pausing 40ms
/// into a 100ms interval and resuming fires 60ms later, not 100ms.
///
/// At most one fire is pending at any time. [`TickTimer::poll`] reports a
/// fire and re-arms for the next full interval, measured from the deadline
/// so the cadence stays stable even when polled late.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    state: TimerState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    /// No pending fire and no stored remainder.
    Stopped,
    /// Armed: fires once `remaining` has elapsed past `since`.
    Running { since: Instant, remaining: Duration },
    /// Cancelled mid-interval with `remaining` still to serve.
    Paused { remaining: Duration },
}

impl TickTimer {
    /// Create a stopped timer with the given interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: TimerState::Stopped,
        }
    }

    /// Current tick period.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the tick period. Takes effect from the next arm or fire; an
    /// already-armed deadline is left as scheduled.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Whether a fire is currently scheduled.
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Arm for a full interval from `now`, discarding any paused remainder.
    pub fn start(&mut self, now: Instant) {
        self.state = TimerState::Running {
            since: now,
            remaining: self.interval,
        };
    }

    /// Cancel the pending fire, keeping the unelapsed part of the interval
    /// for [`TickTimer::resume`]. No-op when not running.
    pub fn pause(&mut self, now: Instant) {
        if let TimerState::Running { since, remaining } = self.state {
            let elapsed = now.duration_since(since);
            self.state = TimerState::Paused {
                remaining: remaining.saturating_sub(elapsed),
            };
        }
    }

    /// Re-arm with the remainder stored by `pause`, or a full interval when
    /// there is none. No-op when already running.
    pub fn resume(&mut self, now: Instant) {
        let remaining = match self.state {
            TimerState::Paused { remaining } => remaining,
            TimerState::Stopped => self.interval,
            TimerState::Running { .. } => return,
        };
        self.state = TimerState::Running {
            since: now,
            remaining,
        };
    }

    /// Cancel entirely, dropping any stored remainder.
    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    /// True when the armed deadline has passed; the timer then re-arms for
    /// one full interval measured from that deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let TimerState::Running { since, remaining } = self.state {
            if now.duration_since(since) >= remaining {
                self.state = TimerState::Running {
                    since: since + remaining,
                    remaining: self.interval,
                };
                return true;
            }
        }
        false
    }

    /// Time until the next fire, when one is scheduled.
    pub fn due_in(&self, now: Instant) -> Option<Duration> {
        match self.state {
            TimerState::Running { since, remaining } => {
                Some(remaining.saturating_sub(now.duration_since(since)))
            }
            _ => None,
        }
    }
}
