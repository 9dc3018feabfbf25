//! Request-scoped values that flow through one `/ask` exchange.
//!
//! Validated question → prompt pair → reply. None of these outlive the
//! request that created them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A learner's age in years. Always finite; fractional ages are allowed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Age(f64);

impl Age {
    /// Returns `None` for NaN or infinite values.
    pub fn new(years: f64) -> Option<Self> {
        years.is_finite().then_some(Self(years))
    }

    pub fn years(&self) -> f64 {
        self.0
    }
}

impl Default for Age {
    fn default() -> Self {
        Self(8.0)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated learner question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    /// Trimmed, non-empty, within the configured length bound.
    pub message: String,
    pub age: Age,
    /// Free-text subject, passed through verbatim ("general" when unset).
    pub subject: String,
}

/// The two instruction strings sent to the provider for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Coarse classification of provider failures, used to pick fallback text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    RateLimited,
    AuthFailure,
    Transport,
    Generic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RateLimited => "rate_limited",
            Self::AuthFailure => "auth_failure",
            Self::Transport => "transport",
            Self::Generic => "generic",
        };
        f.write_str(label)
    }
}

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ReplyOutcome {
    /// The provider answered; `truncated` is set when the cap was applied.
    Answered { truncated: bool },
    /// The provider call failed and a static fallback was substituted.
    Fallback { kind: FailureKind },
}

/// The learner-facing answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskReply {
    pub reply: String,
    pub outcome: ReplyOutcome,
}

impl AskReply {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ReplyOutcome::Fallback { .. })
    }
}
