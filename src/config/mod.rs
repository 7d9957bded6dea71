pub mod defaults;
pub mod settings;

pub use defaults::DefaultConfig;
pub use settings::{CleanupConfig, Config, DeletionStrategy, FileScanConfig, ScanConfig};
