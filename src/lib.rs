//! zodiac-fortune - Daily horoscope chat library
//!
//! This library provides the core functionality for zodiac-fortune: birth
//! date classification, fortune prompts, text generation providers, and the
//! session transcript.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `zodiac`: Zodiac signs, the date table, and birth date parsing
//! - `prompts`: Fortune prompt construction
//! - `providers`: Text generation provider abstraction (Gemini, Ollama)
//! - `fortune`: Request orchestration and the session transcript
//! - `credentials`: API key lookup and keyring storage
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```no_run
//! use zodiac_fortune::fortune::{FortuneTeller, Selection, Transcript};
//! use zodiac_fortune::providers::create_provider;
//! use zodiac_fortune::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider.provider_type, &config.provider)?;
//!     let teller = FortuneTeller::new(provider);
//!     let mut transcript = Transcript::new();
//!     teller
//!         .request(&mut transcript, &Selection::BirthDate("1990-08-01".into()))
//!         .await?;
//!     for line in transcript.lines() {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fortune;
pub mod prompts;
pub mod providers;
pub mod zodiac;

// Re-export commonly used types
pub use config::Config;
pub use error::{FortuneError, Result};
pub use fortune::{FortuneTeller, Selection, SelectionMode, Transcript};
pub use zodiac::ZodiacSign;

#[cfg(test)]
pub mod test_utils;
