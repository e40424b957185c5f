//! Request handler module
//!
//! Serves the working directory: method validation, file and directory
//! responses, and the no-cache header hook applied to every response.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
