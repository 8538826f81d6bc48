//! Domain types and seams for rankwatch.
//!
//! Rank resolution, history queries and the report pivot live here. The
//! search backend and the history file are reached only through the
//! [`search::SearchProvider`] and [`history::HistoryStore`] traits, so nothing
//! in this crate does network or file IO.

pub mod error;
pub mod history;
pub mod matrix;
pub mod observation;
pub mod resolver;
pub mod search;

pub use error::{Error, Result};
