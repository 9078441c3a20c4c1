//! Storage Layer
//!
//! Handles data persistence for the JSON config.

pub mod config;

pub use config::*;
