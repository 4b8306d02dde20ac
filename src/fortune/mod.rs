//! Fortune module for zodiac-fortune
//!
//! This module contains the session transcript and the fortune teller that
//! validates a selection, calls the provider, and records the exchange.

pub mod teller;
pub mod transcript;

pub use teller::{FortuneTeller, Resolved, Selection};
pub use transcript::{Role, SelectionMode, Transcript, Turn};
