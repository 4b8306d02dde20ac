//! Command-line interface definition for zodiac-fortune
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot fortunes, offline sign
//! lookup, and API key storage.

use clap::{ArgGroup, Parser, Subcommand};

/// zodiac-fortune - Daily horoscope chat backed by a text generation service
///
/// Pick a zodiac sign or enter a birth date and get today's fortune.
#[derive(Parser, Debug, Clone)]
#[command(name = "zodiac-fortune")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "ZODIAC_FORTUNE_CONFIG",
        default_value = "config/config.yaml"
    )]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for zodiac-fortune
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive fortune session
    Chat {
        /// Override the provider from config (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model of the selected provider
        #[arg(long)]
        model: Option<String>,

        /// Starting selection mode: sign or birthdate
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Ask for a single fortune and print the transcript
    #[command(group(ArgGroup::new("selection").required(true).args(["sign", "date"])))]
    Ask {
        /// Zodiac sign, Korean or English name (e.g. 사자자리, Leo)
        #[arg(short, long)]
        sign: Option<String>,

        /// Birth date in YYYY-MM-DD format
        #[arg(short, long)]
        date: Option<String>,

        /// Override the provider from config (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the model of the selected provider
        #[arg(long)]
        model: Option<String>,

        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the zodiac sign for a birth date without calling any service
    Sign {
        /// Birth date in YYYY-MM-DD format
        date: String,
    },

    /// List the twelve signs with their date ranges
    Signs,

    /// Store an API key in the system keyring
    Auth {
        /// Provider to store the key for (gemini)
        #[arg(short, long)]
        provider: Option<String>,
    },
}

impl Commands {
    /// Provider and model overrides carried by the command, if any
    pub fn provider_overrides(&self) -> (Option<&str>, Option<&str>) {
        match self {
            Self::Chat {
                provider, model, ..
            }
            | Self::Ask {
                provider, model, ..
            } => (provider.as_deref(), model.as_deref()),
            _ => (None, None),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Signs,
        }
    }
}
