//! Request handler module
//!
//! Routes incoming requests: GET/HEAD to the static file pipeline with
//! clean-URL rewriting, POST to the admin API dispatcher.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
