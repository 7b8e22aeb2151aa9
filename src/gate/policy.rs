//! Lockout policy and the gate's externally visible state.

use chrono::{DateTime, Duration, Utc};

/// Failed attempts allowed before the gate locks.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Length of the lockout window in seconds.
pub const LOCKOUT_SECONDS: u64 = 300;

/// How many failures lock the gate, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub lockout_seconds: u64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_LOGIN_ATTEMPTS,
            lockout_seconds: LOCKOUT_SECONDS,
        }
    }
}

impl LockoutPolicy {
    /// The instant a lockout started at `now` ends.
    pub fn lock_until(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let seconds = i64::try_from(self.lockout_seconds).unwrap_or(i64::MAX);
        Duration::try_seconds(seconds)
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Current state of the admin gate, for rendering to the user.
///
/// Vault operations never expose this; they only report access denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Verification attempts are accepted.
    Unlocked {
        /// Consecutive failures so far.
        attempts: u32,
        /// Failures left before the gate locks.
        remaining_attempts: u32,
    },
    /// Every attempt is rejected until the window ends.
    Locked { remaining: std::time::Duration },
}

impl GateStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_constants() {
        let policy = LockoutPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.lockout_seconds, 300);
    }

    #[test]
    fn lock_until_adds_window() {
        let now = Utc::now();
        let until = LockoutPolicy::default().lock_until(now);
        assert_eq!((until - now).num_seconds(), 300);
    }

    #[test]
    fn huge_window_saturates() {
        let policy = LockoutPolicy {
            max_attempts: 1,
            lockout_seconds: u64::MAX,
        };
        assert_eq!(policy.lock_until(Utc::now()), DateTime::<Utc>::MAX_UTC);
    }
}
