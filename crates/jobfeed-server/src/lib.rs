//! Jobfeed Server Library
//!
//! Service for importing job postings from third-party RSS/Atom feeds.
//!
//! # Architecture
//!
//! Two execution contexts connected only through the job queue:
//!
//! - **Producer** (`jobfeed-server` binary): the HTTP trigger endpoint and
//!   the cron tick fetch a feed, normalize it into candidates and enqueue
//!   bounded work units under a shared run id.
//! - **Consumer** (`jobfeed-worker` binary): apalis workers pull one unit at
//!   a time, bulk-upsert its candidates idempotently and append one import
//!   log entry per unit. Multiple worker processes may run side by side.
//!
//! Persistence goes through repository traits (`db::repository`) so the
//! upsert engine and log recorder never see a concrete store driver.
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP surface (thin CRUD for sources and logs)
//! - **SQLx**: PostgreSQL store, runtime-checked queries
//! - **Apalis**: at-least-once work queue with backend-owned retries

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;

pub use error::{AppError, AppResult};
