//! Request handler module
//!
//! Routing dispatch plus the two tenant lookup endpoints.

pub mod router;
pub mod tenant;

// Re-export main entry point
pub use router::handle_request;
