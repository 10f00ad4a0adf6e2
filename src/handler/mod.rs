//! Request handler module
//!
//! Routes requests and renders the localized index page.

pub mod index;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
