//! discord-doctor Library
//!
//! One-shot diagnostic for Discord bot credentials: token, guild id, channel id.
//!
//! ## Architecture
//!
//! The codebase is organized into modules:
//! - `logging`: Structured logging with tracing
//! - `config`: Credential loading from the environment / .env files
//! - `probe`: Check pipeline, report types and the session trait
//! - `discord`: Serenity gateway lifecycle (connect, ready handler, shutdown)
//! - `report`: Console rendering (banners, sections, summary)
//!
//! ## Main Entry Point
//!
//! - `discord::connect_and_probe()`: connect, wait for ready, run the checks,
//!   close the session and return the assembled [`probe::ProbeReport`].

mod logging;
pub mod config;
pub mod discord;
pub mod probe;
pub mod report;

// Re-export logging setup for the binary.
pub use logging::init_tracing;
