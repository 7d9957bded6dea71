pub mod parallel_scanner;
pub mod pruning_walker;
pub mod size_calculator;

pub use parallel_scanner::{validate_base_dir, ParallelScanner, ScanProgress};
pub use pruning_walker::{PruningWalker, WalkDecision, WalkRules, WalkSummary};
pub use size_calculator::{DirectorySizeInfo, SizeCalculator};
