pub mod config;
pub mod error;
pub mod models;
pub mod operations;
pub mod scanner;
pub mod tui;
pub mod utils;

// 重新导出常用模块
pub use config::{Config, DeletionStrategy, ScanConfig};
pub use error::{ScanError, ScanResult};
pub use models::{MatchRecord, ScanOutcome, TraversalWarning};
pub use scanner::{ParallelScanner, PruningWalker, SizeCalculator};
