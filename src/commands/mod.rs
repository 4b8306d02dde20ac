/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`  - Interactive fortune session
- `ask`   - One-shot fortune request
- `sign`  - Offline birth date classification
- `signs` - Sign table listing
- `auth`  - API key storage
*/

use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::config::Config;
use crate::error::{FortuneError, Result};
use crate::fortune::{FortuneTeller, Role, Selection, SelectionMode, Transcript, Turn};
use crate::providers::{create_provider, Provider};
use crate::zodiac::{self, ZodiacSign};
use colored::Colorize;

// Special commands parser for the chat loop
pub mod special_commands;

/// Colored prompt tag for a selection mode
pub fn mode_tag(mode: SelectionMode) -> String {
    match mode {
        SelectionMode::BySign => format!("[{}]", "SIGN".purple()),
        SelectionMode::ByBirthDate => format!("[{}]", "BIRTH".cyan()),
    }
}

/// One transcript turn with the role colored
pub fn format_turn(turn: &Turn) -> String {
    let role = match turn.role() {
        Role::User => format!("[{}]", turn.role()).blue().bold(),
        Role::Assistant => format!("[{}]", turn.role()).green().bold(),
    };
    format!(
        "{} {} : {}",
        role,
        format!("({})", turn.mode().label()).dimmed(),
        turn.content()
    )
}

/// Print the whole transcript, one turn per block
pub fn render_transcript(transcript: &Transcript) {
    println!();
    for turn in transcript.turns() {
        println!("{}\n", format_turn(turn));
    }
}

/// Parse an optional mode argument, falling back to the configured default
fn resolve_mode(mode: Option<&str>, default: SelectionMode) -> Result<SelectionMode> {
    match mode {
        Some(value) => SelectionMode::parse_str(value)
            .map_err(|e| FortuneError::Validation(e).into()),
        None => Ok(default),
    }
}

/// Print the twelve signs and their date ranges
fn print_sign_table() {
    for sign in ZodiacSign::ALL {
        println!(
            "{}  {:<12} {}",
            sign.date_range(),
            sign.label(),
            sign.english_name().dimmed()
        );
    }
}

// Chat command handler
pub mod chat {
    //! Interactive fortune session handler.
    //!
    //! Builds the provider once, then reads lines with rustyline. Each line is
    //! either a special command or a selection for the current mode; after
    //! every fortune request the transcript is printed again.

    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start an interactive fortune session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `mode` - Optional override for the starting selection mode
    ///
    /// # Errors
    ///
    /// Returns error if the mode is invalid, the provider cannot be created,
    /// or the terminal cannot be opened. Failed fortune requests are reported
    /// and the session continues.
    pub async fn run_chat(config: Config, mode: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive fortune session");

        let mut mode = resolve_mode(mode.as_deref(), config.chat.default_mode)?;
        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let teller = FortuneTeller::new(provider);
        let mut transcript = Transcript::new();

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(mode);

        loop {
            let prompt = format!("{} >> ", mode_tag(mode));
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::SwitchMode(new_mode)) => {
                            if new_mode != mode {
                                println!("Switched from {} to {}\n", mode, new_mode);
                                mode = new_mode;
                            }
                            println!("{}\n", mode.input_hint());
                            continue;
                        }
                        Ok(SpecialCommand::ListSigns) => {
                            print_sign_table();
                            continue;
                        }
                        Ok(SpecialCommand::ShowHistory) => {
                            if transcript.is_empty() {
                                println!("No fortunes yet.\n");
                            } else {
                                render_transcript(&transcript);
                            }
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(&config, &teller, mode, &transcript);
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}", e.to_string().yellow());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;

                    let selection = Selection::new(mode, trimmed);
                    if let Err(e) = teller.request(&mut transcript, &selection).await {
                        print_request_error(&e);
                    }
                    render_transcript(&transcript);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Warn about a failed request without leaving the session
    fn print_request_error(error: &anyhow::Error) {
        match error.downcast_ref::<FortuneError>() {
            Some(FortuneError::Validation(message)) => {
                eprintln!("{} {}", "!".yellow().bold(), message.yellow());
            }
            Some(FortuneError::Service(message)) => {
                eprintln!(
                    "{} {}",
                    "!".red().bold(),
                    format!("Could not get a fortune: {}", message).red()
                );
            }
            _ => eprintln!("{} {}", "!".red().bold(), error),
        }
    }

    fn print_welcome_banner(mode: SelectionMode) {
        println!("\n{}", "🔮 오늘의 별자리 운세 챗봇".bold());
        println!("{}\n", "=".repeat(40));
        println!("Mode: {} ({})", mode_tag(mode), mode);
        println!("{}", mode.input_hint());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status_display<P: Provider>(
        config: &Config,
        teller: &FortuneTeller<P>,
        mode: SelectionMode,
        transcript: &Transcript,
    ) {
        let model = teller
            .provider()
            .get_current_model()
            .unwrap_or_else(|_| config.active_model().to_string());

        println!();
        println!("Provider:        {}", config.provider.provider_type);
        println!("Model:           {}", model);
        println!("Selection Mode:  {} ({})", mode_tag(mode), mode);
        println!("Transcript Size: {} turns", transcript.len());
        println!();
    }

}

// One-shot request handler
pub mod ask {
    use super::*;

    /// Request a single fortune and print the resulting transcript
    ///
    /// Exactly one of `sign` and `date` is expected; clap enforces this for
    /// the command line.
    ///
    /// # Errors
    ///
    /// Returns error if the selection is invalid, the provider cannot be
    /// created, or the request fails.
    pub async fn run_ask(
        config: Config,
        sign: Option<String>,
        date: Option<String>,
        json: bool,
    ) -> Result<()> {
        let selection = selection_from_args(sign, date)?;

        // Validate before building the provider so bad input needs no API key
        selection.resolve()?;

        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let teller = FortuneTeller::new(provider);
        let mut transcript = Transcript::new();

        teller.request(&mut transcript, &selection).await?;

        if json {
            println!("{}", transcript_json(&transcript)?);
        } else {
            render_transcript(&transcript);
        }
        Ok(())
    }

    /// Pretty JSON rendering of a transcript
    pub fn transcript_json(transcript: &Transcript) -> Result<String> {
        serde_json::to_string_pretty(transcript).map_err(|e| FortuneError::from(e).into())
    }

    /// Build a selection from the `--sign` / `--date` arguments
    pub fn selection_from_args(sign: Option<String>, date: Option<String>) -> Result<Selection> {
        match (sign, date) {
            (Some(sign), None) => Ok(Selection::Sign(sign)),
            (None, Some(date)) => Ok(Selection::BirthDate(date)),
            (Some(_), Some(_)) => Err(FortuneError::Validation(
                "Use either --sign or --date, not both".to_string(),
            )
            .into()),
            (None, None) => Err(FortuneError::Validation(
                "One of --sign or --date is required".to_string(),
            )
            .into()),
        }
    }

}

// Offline classification handler
pub mod sign {
    use super::*;

    /// Print the sign for a birth date
    ///
    /// # Errors
    ///
    /// Returns `FortuneError::Validation` if the date is malformed
    pub fn run_sign(date: &str) -> Result<()> {
        println!("{}", describe_birth_date(date)?);
        Ok(())
    }

    /// One-line description of the sign for a birth date
    ///
    /// # Examples
    ///
    /// ```
    /// use zodiac_fortune::commands::sign::describe_birth_date;
    ///
    /// let line = describe_birth_date("1990-08-01").unwrap();
    /// assert!(line.contains("사자자리"));
    /// ```
    pub fn describe_birth_date(date: &str) -> Result<String> {
        let parsed = zodiac::parse_birth_date(date)?;
        let sign = ZodiacSign::from_date(parsed).ok_or_else(|| {
            FortuneError::Validation(format!("No zodiac sign covers {}", parsed))
        })?;
        tracing::debug!("Classified {} as {:?}", parsed, sign);
        Ok(format!(
            "{} {} ({}, {})",
            parsed,
            sign.label(),
            sign.english_name(),
            sign.date_range()
        ))
    }

}

// Sign table handler
pub mod signs {
    use super::*;

    /// Print all twelve signs with their date ranges
    pub fn list_signs() {
        print_sign_table();
    }
}

/// Auth command(s)
///
/// Stores a provider API key in the system keyring.
pub mod auth {
    use super::*;
    use std::io::{BufRead, Write};

    /// Read an API key from stdin and store it for the provider
    ///
    /// # Arguments
    ///
    /// * `provider` - Provider name ("gemini")
    ///
    /// # Errors
    ///
    /// Returns error if the provider takes no key, the key is empty, or the
    /// keyring write fails.
    pub fn authenticate(provider: &str) -> Result<()> {
        tracing::info!("Storing API key for provider: {}", provider);

        match provider {
            "ollama" => {
                println!(
                    "Ollama runs locally and needs no API key; set `provider.ollama.host` instead."
                );
                Ok(())
            }
            other => {
                crate::credentials::keyring_user_for(other)?;

                print!("Enter the {} API key: ", other);
                std::io::stdout().flush().map_err(FortuneError::from)?;

                let mut key = String::new();
                std::io::stdin()
                    .lock()
                    .read_line(&mut key)
                    .map_err(FortuneError::from)?;

                crate::credentials::store_api_key(other, &key)?;
                println!("{}", "API key stored in the system keyring.".green());
                Ok(())
            }
        }
    }

}
