//! Data Models
//!
//! Contains the data structures shared by services and the CLI.

pub mod roadmap;
pub mod settings;

pub use roadmap::*;
pub use settings::*;
