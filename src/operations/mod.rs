pub mod cleanup;

pub use cleanup::{CleanupOperation, CleanupReport, DeletionOutcome};
