//! The tutor pipeline — the part of KASA with actual rules in it.
//!
//! One learner question flows straight through:
//!
//! 1. **Validate** the raw fields ([`validator`])
//! 2. **Plan** the teaching style from the learner's age and subject ([`age`], [`subject`])
//! 3. **Build** the system + user prompts ([`policy`], [`phonics`])
//! 4. **Complete** through the provider, capped and failure-safe ([`completion`])
//!
//! No state survives between questions.

pub mod age;
pub mod completion;
pub mod phonics;
pub mod policy;
pub mod subject;
pub mod validator;

pub use age::AgeBucket;
pub use completion::{CompletionGateway, CompletionSettings};
pub use policy::{MathRule, PromptPlan, PromptPolicy, SpellingAid};
pub use subject::Subject;
pub use validator::{RawAsk, RequestValidator};

use std::sync::Arc;

use kasa_config::AppConfig;
use kasa_core::ask::{AskReply, AskRequest, PromptPair};
use kasa_core::error::ValidationError;
use kasa_core::provider::Provider;
use tracing::info;

/// Validator, policy and gateway wired together.
pub struct Tutor {
    validator: RequestValidator,
    policy: PromptPolicy,
    gateway: CompletionGateway,
}

impl Tutor {
    pub fn new(
        validator: RequestValidator,
        policy: PromptPolicy,
        gateway: CompletionGateway,
    ) -> Self {
        Self {
            validator,
            policy,
            gateway,
        }
    }

    /// Build the tutor from config around an already-constructed provider.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn Provider>) -> Self {
        Self::new(
            RequestValidator::from_config(&config.tutor),
            PromptPolicy::new(),
            CompletionGateway::new(provider, CompletionSettings::from_config(config)),
        )
    }

    /// Validate and build prompts without calling the provider.
    pub fn prepare(
        &self,
        raw: &RawAsk,
    ) -> Result<(AskRequest, PromptPlan, PromptPair), ValidationError> {
        let request = self.validator.validate(raw)?;
        let plan = self.policy.plan(&request);
        let prompts = self.policy.build(&request);
        Ok((request, plan, prompts))
    }

    /// Answer one question. Only validation can fail; provider trouble
    /// comes back as a fallback reply.
    pub async fn ask(&self, raw: &RawAsk) -> Result<AskReply, ValidationError> {
        let (request, plan, prompts) = self.prepare(raw)?;

        info!(
            age = %request.age,
            bucket = %plan.bucket,
            subject = %request.subject,
            math = ?plan.math,
            spelling = plan.spelling.is_some(),
            "Answering question"
        );

        Ok(self.gateway.reply(&prompts).await)
    }
}
