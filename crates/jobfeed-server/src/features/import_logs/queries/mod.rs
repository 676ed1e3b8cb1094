pub mod list;

pub use list::{ListImportLogsError, ListImportLogsQuery, ListImportLogsResponse};
