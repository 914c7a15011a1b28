//! Local host for the luckywheel draw engine.
//!
//! Wires the engine to a SQLite-backed store, a YAML config and a real-time
//! session that sleeps through each draw's spin and settle phases.

pub mod config;
pub mod media;
pub mod session;
mod store;

pub use config::{Config, ConfigError, ValidatedConfig};
pub use session::Session;
pub use store::SqliteStore;
