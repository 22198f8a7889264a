//! Failed-login lockout state machine.
//!
//! Pure transition logic over the per-user `(failed_attempts, blocked)`
//! pair. Persistence and the decision of *when* to invoke a transition
//! belong to the login handler; this module only answers what the next
//! state is.
//!
//! States: ACTIVE, LOCKED. A bad credential increments the counter and
//! locks the account once the configured maximum is reached. A good
//! credential or an administrative reset returns the counter to zero.
//! There is no time-based transition out of LOCKED.

/// Lock state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Logins are evaluated normally.
    Active,
    /// Every login attempt is rejected without comparing the credential.
    Locked,
}

/// Outcome of registering a failed login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// The new failed-attempt counter value to persist.
    pub attempts: i32,
    /// The resulting lock state.
    pub state:    LockState,
}

/// Lockout policy parameterized by the configured attempt maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    max_attempts: i32,
}

impl LockoutPolicy {
    /// Create a policy. A maximum below 1 is clamped to 1 so a
    /// misconfigured parameter can never disable the lockout entirely.
    #[must_use]
    pub fn new(max_attempts: i32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// The configured attempt maximum.
    #[must_use]
    pub fn max_attempts(&self) -> i32 { self.max_attempts }

    /// Current state for a stored `blocked` flag.
    #[must_use]
    pub fn state_of(&self, blocked: bool) -> LockState {
        if blocked { LockState::Locked } else { LockState::Active }
    }

    /// Register one failed attempt on top of the stored counter.
    ///
    /// Reaching the maximum transitions the account to [`LockState::Locked`].
    #[must_use]
    pub fn register_failure(&self, failed_attempts: i32) -> FailureOutcome {
        let attempts = failed_attempts.max(0).saturating_add(1);
        let state = if attempts >= self.max_attempts {
            LockState::Locked
        }
        else {
            LockState::Active
        };

        FailureOutcome {
            attempts,
            state,
        }
    }
}
