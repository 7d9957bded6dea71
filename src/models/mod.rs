pub mod match_record;
pub mod scan_result;

pub use match_record::{DisplayRecord, MatchRecord, TraversalWarning};
pub use scan_result::{format_all, total_size, ScanOutcome, ScanStats};
