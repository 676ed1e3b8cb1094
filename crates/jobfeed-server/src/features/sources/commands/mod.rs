pub mod create;
pub mod trigger;

pub use create::{CreateSourceCommand, CreateSourceError};
pub use trigger::{TriggerImportCommand, TriggerImportError, TriggerImportResponse};
