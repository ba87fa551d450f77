/*
[INPUT]:  Public API exports for taskdeck-sync crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod error;
pub mod outcome;
pub mod selection;
pub mod store;
pub mod sync;

// Re-export main types for convenience
pub use config::AppConfig;
pub use error::{ErrorKind, SyncError};
pub use outcome::{HistorySummary, LastOutcome, Outcome, evaluate, last_outcome};
pub use selection::{SelectionController, TaskRow};
pub use store::TaskStore;
pub use sync::{ExecutionReport, SearchOutcome, Synchronizer};
