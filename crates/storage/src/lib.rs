//! Storage layer for the site
//!
//! This crate provides the sled-backed key-value store and the persisted
//! visitor preferences built on it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
pub mod preferences;

pub use kv::{KvConfig, KvError, KvStore, LocalStore};
pub use preferences::{ThemeMode, ThemePreference};
