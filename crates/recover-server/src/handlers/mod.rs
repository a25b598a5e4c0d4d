//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod classifier;
pub mod commitments;
pub mod dashboard;
pub mod yearly;

// Re-export all handlers for use in router
pub use classifier::*;
pub use commitments::*;
pub use dashboard::*;
pub use yearly::*;
