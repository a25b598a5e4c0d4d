//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `classify` - One-off transcript classification
//! - `prompt` - Classification prompt rendering
//! - `serve` - Web server command
//! - `status` - Classifier configuration and tracker constants

pub mod classify;
pub mod prompt;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use classify::*;
pub use prompt::*;
pub use serve::*;
pub use status::*;
