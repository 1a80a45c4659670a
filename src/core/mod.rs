//! Core module
//!
//! Configuration and serialized grid layouts

mod config;
mod layout;

pub use config::{ConfigError, NavConfig};
pub use layout::{GridLayout, LayoutError};
