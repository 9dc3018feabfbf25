//! `kasa serve` — Start the HTTP tutoring server.

use kasa_config::AppConfig;

pub async fn run(
    port_override: Option<u16>,
    host_override: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(host) = host_override {
        config.gateway.host = host;
    }

    if let Err(e) = config.require_api_key() {
        tracing::error!(error = %e, "Refusing to start without a provider credential");
        return Err(e.into());
    }

    println!("📚 AI KASA");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model: {}", config.model);

    kasa_gateway::start(config).await?;

    Ok(())
}
