//! Retry state machine for remote calls
//!
//! The machine only decides what happens next; sleeping and sending are left
//! to the caller so the attempt cap and the backoff schedule can be tested
//! without a network or a clock.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry behavior for the remote caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Delay before the retry that follows attempt 0
    pub base_delay_ms: u64,
    /// Retry 4xx responses other than 429
    pub retry_client_errors: bool,
    /// Apply the backoff delay after transport failures too
    pub backoff_on_network_error: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 1000,
            retry_client_errors: true,
            backoff_on_network_error: false,
        }
    }
}

impl RetryPolicy {
    /// `2^attempt * base` for a zero-based attempt number
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// What a single attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 2xx with a decodable body
    Success(String),
    /// Non-2xx status code
    Status(u16),
    /// Transport failure or an undecodable success body
    Network(String),
}

impl AttemptOutcome {
    fn describe(&self) -> String {
        match self {
            AttemptOutcome::Success(_) => "success".to_string(),
            AttemptOutcome::Status(code) => format!("API returned status {}", code),
            AttemptOutcome::Network(detail) => detail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryState {
    /// Ready to send attempt number `attempt` (zero-based)
    Attempting { attempt: u32 },
    /// Wait `delay`, then send attempt number `next_attempt`
    Waiting { next_attempt: u32, delay: Duration },
    Succeeded { text: String, attempts: u32 },
    Failed { attempts: u32, last_error: String },
}

impl RetryState {
    pub fn start() -> Self {
        RetryState::Attempting { attempt: 0 }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Succeeded { .. } | RetryState::Failed { .. })
    }

    /// Feed the outcome of the current attempt.
    ///
    /// Only valid in `Attempting`; other states are returned unchanged.
    pub fn on_outcome(self, outcome: AttemptOutcome, policy: &RetryPolicy) -> RetryState {
        let RetryState::Attempting { attempt } = self else {
            return self;
        };
        let attempts = attempt + 1;

        let backoff = match &outcome {
            AttemptOutcome::Success(text) => {
                return RetryState::Succeeded {
                    text: text.clone(),
                    attempts,
                };
            }
            AttemptOutcome::Status(code) if is_transient_status(*code) => true,
            AttemptOutcome::Status(_) => {
                if !policy.retry_client_errors {
                    return RetryState::Failed {
                        attempts,
                        last_error: outcome.describe(),
                    };
                }
                false
            }
            AttemptOutcome::Network(_) => policy.backoff_on_network_error,
        };

        if attempts >= policy.max_attempts {
            return RetryState::Failed {
                attempts,
                last_error: outcome.describe(),
            };
        }

        if backoff {
            RetryState::Waiting {
                next_attempt: attempts,
                delay: policy.backoff_delay(attempt),
            }
        } else {
            RetryState::Attempting { attempt: attempts }
        }
    }

    /// Leave `Waiting` once the delay has elapsed
    pub fn resume(self) -> RetryState {
        match self {
            RetryState::Waiting { next_attempt, .. } => RetryState::Attempting {
                attempt: next_attempt,
            },
            other => other,
        }
    }
}

/// Rate limiting and server errors back off before the next attempt
pub fn is_transient_status(code: u16) -> bool {
    code == 429 || (500..=599).contains(&code)
}
