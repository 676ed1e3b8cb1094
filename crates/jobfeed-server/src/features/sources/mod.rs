//! Feed source feature: registry CRUD plus the manual import trigger.

pub mod commands;
pub mod queries;
pub mod routes;
