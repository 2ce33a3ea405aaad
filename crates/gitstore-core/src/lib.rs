//! # gitstore-core
//!
//! Configuration and a [`Store`] facade over the gitstore git commands.
//! A store opens one repository handle and reuses it for every read and
//! write, applying the configured author, remotes and empty-commit policy.

pub mod config;
mod error;
mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use store::Store;
