//! CSV backend for the rankwatch history log.
//!
//! Wraps plain file IO in [`tokio::task::spawn_blocking`] so reading and
//! appending never block the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::CsvHistoryStore;
