//! Per-client login throttling
//!
//! After `max_failures` consecutive failed logins a client is locked out for
//! `lock_duration`. A successful login, the lock running out, or a quiet
//! spell of `lock_duration` since the last failure resets the counter.
//! Entries that have gone quiet are swept at most once per `lock_duration`,
//! so the map only holds clients that failed recently.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_failures: u32,
    pub lock_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failures: 5,
            lock_duration: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Default)]
struct AttemptState {
    failures: u32,
    last_failure: Option<Instant>,
    locked_until: Option<Instant>,
}

impl AttemptState {
    /// Neither locked nor holding a failure newer than `window`.
    fn is_stale(&self, now: Instant, window: Duration) -> bool {
        let unlocked = self.locked_until.map_or(true, |until| now >= until);
        let quiet = self
            .last_failure
            .map_or(true, |at| now.saturating_duration_since(at) >= window);
        unlocked && quiet
    }
}

/// Tracks consecutive login failures keyed by client address.
pub struct LoginAttemptTracker {
    policy: LockoutPolicy,
    attempts: DashMap<String, AttemptState>,
    next_sweep: Mutex<Option<Instant>>,
}

impl LoginAttemptTracker {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            attempts: DashMap::new(),
            next_sweep: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> LockoutPolicy {
        self.policy
    }

    /// `Err(remaining)` while the client is locked out.
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.check_at(client, Instant::now())
    }

    /// Count a failure. Returns the lock duration when this failure locks
    /// the client.
    pub fn record_failure(&self, client: &str) -> Option<Duration> {
        self.record_failure_at(client, Instant::now())
    }

    pub fn record_success(&self, client: &str) {
        self.attempts.remove(client);
    }

    fn check_at(&self, client: &str, now: Instant) -> Result<(), Duration> {
        let expired = match self.attempts.get(client) {
            Some(state) => match state.locked_until {
                Some(until) if now < until => return Err(until - now),
                Some(_) => true,
                None => false,
            },
            None => false,
        };
        if expired {
            self.attempts.remove(client);
        }
        Ok(())
    }

    fn record_failure_at(&self, client: &str, now: Instant) -> Option<Duration> {
        self.sweep_at(now);

        let window = self.policy.lock_duration;
        let mut state = self.attempts.entry(client.to_string()).or_default();
        if state.is_stale(now, window) {
            *state = AttemptState::default();
        }
        state.failures += 1;
        state.last_failure = Some(now);
        if state.failures >= self.policy.max_failures {
            state.locked_until = Some(now + self.policy.lock_duration);
            Some(self.policy.lock_duration)
        } else {
            None
        }
    }
}

impl LoginAttemptTracker {
    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.attempts.len()
    }

    /// Drop stale entries, at most once per `lock_duration`.
    fn sweep_at(&self, now: Instant) {
        let window = self.policy.lock_duration;
        {
            let Ok(mut next) = self.next_sweep.lock() else {
                return;
            };
            match *next {
                Some(at) if now < at => return,
                _ => *next = Some(now + window),
            }
        }
        self.attempts.retain(|_, state| !state.is_stale(now, window));
    }
}

impl Default for LoginAttemptTracker {
    fn default() -> Self {
        Self::new(LockoutPolicy::default())
    }
}

/// Whole seconds a client should wait, rounded up and at least 1.
pub fn retry_after_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locks_on_fifth_consecutive_failure() {
        let tracker = LoginAttemptTracker::default();
        let now = Instant::now();

        for _ in 0..4 {
            assert_eq!(tracker.record_failure_at("10.0.0.1", now), None);
            assert!(tracker.check_at("10.0.0.1", now).is_ok());
        }
        assert_eq!(
            tracker.record_failure_at("10.0.0.1", now),
            Some(Duration::from_secs(300))
        );

        let remaining = tracker
            .check_at("10.0.0.1", now + Duration::from_secs(60))
            .unwrap_err();
        assert_eq!(remaining, Duration::from_secs(240));
    }

    #[test]
    fn clients_are_tracked_independently() {
        let tracker = LoginAttemptTracker::default();
        let now = Instant::now();
        for _ in 0..5 {
            tracker.record_failure_at("10.0.0.1", now);
        }
        assert!(tracker.check_at("10.0.0.1", now).is_err());
        assert!(tracker.check_at("10.0.0.2", now).is_ok());
    }

    #[test]
    fn success_resets_the_counter() {
        let tracker = LoginAttemptTracker::default();
        let now = Instant::now();
        for _ in 0..4 {
            tracker.record_failure_at("c", now);
        }
        tracker.record_success("c");
        for _ in 0..4 {
            assert_eq!(tracker.record_failure_at("c", now), None);
        }
    }

    #[test]
    fn cool_down_resets_the_counter() {
        let tracker = LoginAttemptTracker::new(LockoutPolicy {
            max_failures: 2,
            lock_duration: Duration::from_secs(10),
        });
        let now = Instant::now();
        tracker.record_failure_at("c", now);
        tracker.record_failure_at("c", now);
        assert!(tracker.check_at("c", now + Duration::from_secs(9)).is_err());

        let later = now + Duration::from_secs(10);
        assert!(tracker.check_at("c", later).is_ok());
        assert_eq!(tracker.record_failure_at("c", later), None);
    }

    #[test]
    fn old_failures_stop_counting() {
        let tracker = LoginAttemptTracker::new(LockoutPolicy {
            max_failures: 3,
            lock_duration: Duration::from_secs(10),
        });
        let now = Instant::now();
        tracker.record_failure_at("c", now);
        tracker.record_failure_at("c", now);

        let later = now + Duration::from_secs(11);
        assert_eq!(tracker.record_failure_at("c", later), None);
        assert_eq!(tracker.record_failure_at("c", later), None);
        assert_eq!(
            tracker.record_failure_at("c", later),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn quiet_clients_are_swept() {
        let tracker = LoginAttemptTracker::new(LockoutPolicy {
            max_failures: 3,
            lock_duration: Duration::from_secs(10),
        });
        let now = Instant::now();
        for n in 0..100 {
            tracker.record_failure_at(&format!("10.0.0.{n}"), now);
        }
        assert_eq!(tracker.tracked_clients(), 100);

        tracker.record_failure_at("10.0.1.1", now + Duration::from_secs(10));
        assert_eq!(tracker.tracked_clients(), 1);
    }

    #[test]
    fn sweep_keeps_locked_and_recent_clients() {
        let tracker = LoginAttemptTracker::new(LockoutPolicy {
            max_failures: 2,
            lock_duration: Duration::from_secs(10),
        });
        let now = Instant::now();
        tracker.record_failure_at("quiet", now);

        let later = now + Duration::from_secs(5);
        tracker.record_failure_at("locked", later);
        tracker.record_failure_at("locked", later);
        tracker.record_failure_at("recent", later);

        tracker.record_failure_at("new", now + Duration::from_secs(12));
        assert_eq!(tracker.tracked_clients(), 3);
        assert!(tracker
            .check_at("locked", now + Duration::from_secs(12))
            .is_err());
    }

    #[test]
    fn retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_secs(Duration::from_secs(240)), 240);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }
}
