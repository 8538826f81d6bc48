//! Google Custom Search JSON API backend for rankwatch.
//!
//! [`CustomSearchClient`] implements [`rankwatch_core::search::SearchProvider`].
//! Each region maps to its own search engine id (`cx`); regions without one
//! fall back to the global engine.

pub mod client;
pub mod config;
pub mod error;

pub use client::CustomSearchClient;
pub use config::SearchConfig;
pub use error::{Error, Result};
