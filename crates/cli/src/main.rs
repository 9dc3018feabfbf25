//! KASA CLI, the main entry point.
//!
//! Commands:
//! - `serve`   — Start the HTTP tutoring server
//! - `ask`     — Answer one question from the terminal
//! - `prompt`  — Show the prompts a question would produce
//! - `doctor`  — Diagnose config and credentials

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "kasa",
    about = "AI KASA — a child-safe tutoring backend",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind address
        #[arg(long)]
        host: Option<String>,
    },

    /// Ask one question and print the reply
    Ask {
        /// The learner's question
        message: String,

        /// Learner age in years
        #[arg(short, long)]
        age: Option<f64>,

        /// Subject name, e.g. math or english
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Print the system and user prompts without calling the provider
    Prompt {
        /// The learner's question
        message: String,

        /// Learner age in years
        #[arg(short, long)]
        age: Option<f64>,

        /// Subject name, e.g. math or english
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// Diagnose configuration health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Ask {
            message,
            age,
            subject,
        } => commands::ask::run(message, age, subject).await?,
        Commands::Prompt {
            message,
            age,
            subject,
        } => commands::prompt::run(message, age, subject)?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
