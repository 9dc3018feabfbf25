//! `kasa doctor` — Diagnose config and credentials.

use kasa_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 AI KASA Doctor");
    println!("=================\n");

    let mut issues = 0;

    let config_path = std::env::var("KASA_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| AppConfig::config_path());
    if config_path.exists() {
        println!("  ✅ Config file found at {}", config_path.display());
    } else {
        println!(
            "  ℹ️  No config file at {}, using defaults",
            config_path.display()
        );
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue found. See above for details.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ Provider credential configured");
        match kasa_providers::build_from_config(&config) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  ✅ Provider reachable at {}", config.api_url),
                Ok(false) => {
                    println!("  ⚠️  Provider at {} reported unhealthy", config.api_url);
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider check failed: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Could not build provider: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ❌ No credential: set KASA_API_KEY or OPENAI_API_KEY");
        issues += 1;
    }

    println!("  ℹ️  Model {} (timeout {}s)", config.model, config.request_timeout_secs);

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
