//! `kasa ask` — Run one question through the full pipeline.

use kasa_config::AppConfig;
use kasa_core::Error;
use kasa_tutor::{RawAsk, Tutor};

pub async fn run(
    message: String,
    age: Option<f64>,
    subject: Option<String>,
) -> kasa_core::Result<()> {
    let config = AppConfig::load().map_err(Error::config)?;
    let provider = kasa_providers::build_from_config(&config)?;
    let tutor = Tutor::from_config(&config, provider);

    let reply = tutor.ask(&RawAsk::new(message, age, subject)).await?;

    println!("{}", reply.reply);
    if reply.is_fallback() {
        eprintln!("(provider failed: {:?})", reply.outcome);
    }

    Ok(())
}
