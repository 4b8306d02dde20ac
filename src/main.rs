//! zodiac-fortune - Daily horoscope chat CLI
//!
#![doc = "Main entry point for the zodiac-fortune application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use zodiac_fortune::cli::{Cli, Commands};
use zodiac_fortune::commands;
use zodiac_fortune::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Offline commands need no configuration
    match &cli.command {
        Commands::Sign { date } => return commands::sign::run_sign(date),
        Commands::Signs => {
            commands::signs::list_signs();
            return Ok(());
        }
        _ => {}
    }

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    config.validate()?;

    match cli.command {
        Commands::Chat { mode, .. } => {
            if let Some(m) = &mode {
                tracing::debug!("Using mode override: {}", m);
            }
            commands::chat::run_chat(config, mode).await?;
            Ok(())
        }
        Commands::Ask {
            sign, date, json, ..
        } => {
            commands::ask::run_ask(config, sign, date, json).await?;
            Ok(())
        }
        Commands::Auth { provider } => {
            let provider = provider.unwrap_or_else(|| config.provider.provider_type.clone());
            commands::auth::authenticate(&provider)?;
            Ok(())
        }
        Commands::Sign { .. } | Commands::Signs => Ok(()),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with the transcript on stdout.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "zodiac_fortune=debug"
    } else {
        "zodiac_fortune=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
