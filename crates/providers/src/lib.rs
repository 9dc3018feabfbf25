//! Chat-completion provider implementations for KASA.
//!
//! All providers implement the `kasa_core::Provider` trait.
//! `build_from_config` turns the validated `AppConfig` into the provider the
//! tutor talks to.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use std::sync::Arc;
use std::time::Duration;

use kasa_config::AppConfig;
use kasa_core::Provider;
use kasa_core::error::ProviderError;

/// Build the configured provider.
///
/// Fails with `NotConfigured` when no credential is set, so a server never
/// starts without one.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .require_api_key()
        .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;

    let provider = OpenAiCompatProvider::new(
        "openai",
        &config.api_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    Ok(Arc::new(provider))
}
