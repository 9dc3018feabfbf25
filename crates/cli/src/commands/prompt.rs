//! `kasa prompt` — Show the prompts a question would produce.
//!
//! Needs no credential and makes no network calls.

use kasa_config::AppConfig;
use kasa_core::{Error, Provider};
use kasa_core::error::ProviderError;
use kasa_core::provider::{ProviderRequest, ProviderResponse};
use kasa_tutor::{RawAsk, Tutor};
use std::sync::Arc;

/// Stands in for the real provider; `prepare` never calls it.
struct Offline;

#[async_trait::async_trait]
impl Provider for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::NotConfigured("prompt preview only".into()))
    }
}

pub fn run(
    message: String,
    age: Option<f64>,
    subject: Option<String>,
) -> kasa_core::Result<()> {
    let config = AppConfig::load().map_err(Error::config)?;
    let tutor = Tutor::from_config(&config, Arc::new(Offline));

    let (request, plan, prompts) = tutor.prepare(&RawAsk::new(message, age, subject))?;

    println!("Age: {} ({})", request.age, plan.bucket.label());
    println!("Subject: {} (rules: {:?})", request.subject, plan.subject);
    println!("Plan: {}", serde_json::to_string(&plan)?);
    println!("\n--- system ---\n{}", prompts.system);
    println!("\n--- user ---\n{}", prompts.user);

    Ok(())
}
