//! Shared foundation for the jobfeed workspace.
//!
//! Holds the pieces every other crate leans on:
//!
//! - **error**: the closed import error taxonomy with stable machine codes
//! - **logging**: tracing subscriber setup shared by all binaries
//! - **types**: canonical domain types (job candidates, failure reasons)

pub mod error;
pub mod logging;
pub mod types;

pub use error::{FeedFormatKind, ImportError, Result};
pub use types::{FailureReason, JobCandidate};
