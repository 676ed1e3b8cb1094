//! Import log feature: read-only access to the audit trail.

pub mod queries;
pub mod routes;
