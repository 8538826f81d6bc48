//! Natural-language rank questions for rankwatch.
//!
//! [`RankAgent`] hands a free-text question to a hosted Gemini model together
//! with one typed function, `check_website_rank { keyword, domain }`. When the
//! model calls it, the agent runs a [`RankLookup`] and returns the structured
//! [`RankAnswer`] to the model, then relays the model's final text.

pub mod agent;
pub mod config;
pub mod error;
pub mod gemini;
pub mod tool;

pub use agent::RankAgent;
pub use config::GeminiConfig;
pub use error::{Error, Result};
pub use tool::{RankAnswer, RankLookup, RankQuery, ResolverLookup};
