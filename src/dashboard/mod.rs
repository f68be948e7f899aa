//! Dashboard assembly.
//!
//! Ties the Filter Engine, Aggregation Engine and Presentation Adapter into
//! one synchronous refresh producing a versioned `Dashboard` document.

pub mod pipeline;
pub mod schema;

// Re-export main types and functions
pub use pipeline::{build_panels, refresh};
pub use schema::{Dashboard, Panel};
