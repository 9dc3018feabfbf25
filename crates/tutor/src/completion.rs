//! Completion gateway — one provider call per question, never an error.
//!
//! Sends the prompt pair through the `Provider` trait under a timeout,
//! trims and caps the answer, and swaps any failure for a fixed
//! learner-friendly message. The underlying error only goes to the log.

use std::sync::Arc;
use std::time::Duration;

use kasa_config::AppConfig;
use kasa_core::ask::{AskReply, FailureKind, PromptPair, ReplyOutcome};
use kasa_core::error::ProviderError;
use kasa_core::message::Message;
use kasa_core::provider::{Provider, ProviderRequest};
use tracing::{debug, warn};

/// Appended when a reply had to be cut to fit the cap.
pub const CONTINUED_MARKER: &str = "... (continued)";

pub const RATE_LIMITED_REPLY: &str =
    "Wow, so many questions! My brain needs a little break. Let's take a short rest and try again in a minute. 😊";

pub const AUTH_FAILURE_REPLY: &str =
    "Oops! My brain connection isn't working right now. Please ask a grown-up to check my settings. 🔌";

pub const GENERIC_FAILURE_REPLY: &str =
    "I'm having a little trouble thinking right now. Let's try again together! 😊";

/// The fixed learner-facing text for a failure kind.
pub fn fallback_reply(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::RateLimited => RATE_LIMITED_REPLY,
        FailureKind::AuthFailure => AUTH_FAILURE_REPLY,
        FailureKind::Transport | FailureKind::Generic => GENERIC_FAILURE_REPLY,
    }
}

/// Cut `text` to at most `cap` characters, keeping the leading part.
///
/// When cut, the result ends with [`CONTINUED_MARKER`] and still fits in
/// `cap`. Caps too small to hold the marker get a plain cut.
/// Returns the text and whether it was truncated.
pub fn truncate_reply(text: &str, cap: usize) -> (String, bool) {
    if text.chars().count() <= cap {
        return (text.to_string(), false);
    }

    let marker_len = CONTINUED_MARKER.chars().count();
    if cap <= marker_len {
        return (text.chars().take(cap).collect(), true);
    }

    let head: String = text.chars().take(cap - marker_len).collect();
    let head = head.trim_end();
    let mut out = String::with_capacity(head.len() + CONTINUED_MARKER.len());
    out.push_str(head);
    out.push_str(CONTINUED_MARKER);
    (out, true)
}

/// Sampling and bounds for the provider call.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f32>,
    pub timeout: Duration,
    pub reply_char_cap: usize,
}

impl CompletionSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            timeout: Duration::from_secs(config.request_timeout_secs),
            reply_char_cap: config.tutor.reply_char_cap,
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

pub struct CompletionGateway {
    provider: Arc<dyn Provider>,
    settings: CompletionSettings,
}

impl CompletionGateway {
    pub fn new(provider: Arc<dyn Provider>, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    /// Ask the provider and return a bounded reply. Failures become fallbacks.
    pub async fn reply(&self, prompts: &PromptPair) -> AskReply {
        match self.complete(prompts).await {
            Ok(text) => {
                let (reply, truncated) = truncate_reply(&text, self.settings.reply_char_cap);
                debug!(
                    chars = reply.chars().count(),
                    truncated, "Completion received"
                );
                AskReply {
                    reply,
                    outcome: ReplyOutcome::Answered { truncated },
                }
            }
            Err(e) => {
                let kind = e.kind();
                warn!(
                    provider = %self.provider.name(),
                    failure = %kind,
                    error = %e,
                    "Completion failed, sending fallback reply"
                );
                AskReply {
                    reply: fallback_reply(kind).to_string(),
                    outcome: ReplyOutcome::Fallback { kind },
                }
            }
        }
    }

    /// The raw provider exchange: trimmed text or the reason it failed.
    pub async fn complete(&self, prompts: &PromptPair) -> Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages: vec![
                Message::system(prompts.system.clone()),
                Message::user(prompts.user.clone()),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            top_p: self.settings.top_p,
        };

        let response = tokio::time::timeout(self.settings.timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!(
                    "no completion after {}s",
                    self.settings.timeout.as_secs()
                ))
            })??;

        let text = response.message.content.trim();
        if text.is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        Ok(text.to_string())
    }
}
