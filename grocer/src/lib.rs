//! Grocer Core - Rust business logic for the Go-T-Grocery mobile app
//!
//! This library implements the logic behind the grocery search, details,
//! pantry filter and login screens: a pure catalog query engine and a small
//! local account store over an injected key-value namespace.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).

pub mod accounts;
pub mod catalog;
mod engine;
pub mod interface;
pub mod models;
pub mod pantry;
pub mod selection;
pub mod storage;

pub use accounts::AccountStore;
pub use engine::*;
pub use interface::*;
pub use storage::{MemoryKeyValueStore, SqliteKeyValueStore};

uniffi::setup_scaffolding!("grocer");
