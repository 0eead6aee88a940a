//! Core domain + application logic for the Telegram file-relay bot.
//!
//! This crate is intentionally framework-agnostic. Telegram lives behind
//! ports (traits) implemented in the adapter crate.

pub mod config;
pub mod domain;
pub mod errors;
pub mod files;
pub mod forward;
pub mod logging;
pub mod messaging;
pub mod security;
pub mod titles;
pub mod topics;

pub use errors::{Error, Result};
