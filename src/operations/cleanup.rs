use std::path::Path;

use crate::config::DeletionStrategy;
use crate::error::{ScanError, ScanResult};
use crate::models::{total_size, MatchRecord};

/// 清理操作 - 逐个删除已确认的目录
///
/// 只在扫描全部结束后顺序执行，单个路径失败不影响其余路径。
pub struct CleanupOperation {
    strategy: DeletionStrategy,
}

/// 单个路径的删除结果
#[derive(Debug)]
pub struct DeletionOutcome {
    pub record: MatchRecord,
    pub result: ScanResult<()>,
}

impl DeletionOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// 一次清理的汇总
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub outcomes: Vec<DeletionOutcome>,
}

impl CleanupReport {
    /// 成功删除的记录
    pub fn deleted(&self) -> Vec<MatchRecord> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.record.clone())
            .collect()
    }

    /// 删除失败的数量
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// 实际释放的空间
    pub fn freed_bytes(&self) -> u64 {
        total_size(&self.deleted())
    }
}

impl CleanupOperation {
    pub fn new(strategy: DeletionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> DeletionStrategy {
        self.strategy
    }

    /// 删除所有记录，每处理完一个路径回调一次
    pub fn delete_all<F>(&self, records: &[MatchRecord], mut on_outcome: F) -> CleanupReport
    where
        F: FnMut(&DeletionOutcome),
    {
        let mut report = CleanupReport::default();

        for record in records {
            let result = self.delete_one(&record.path);
            match &result {
                Ok(()) => tracing::info!("已删除 {}", record.path.display()),
                Err(err) => tracing::warn!("{}", err),
            }

            let outcome = DeletionOutcome {
                record: record.clone(),
                result,
            };
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        report
    }

    fn delete_one(&self, path: &Path) -> ScanResult<()> {
        let deletion_error = |message: String| ScanError::Deletion {
            path: path.to_path_buf(),
            message,
        };

        match self.strategy {
            DeletionStrategy::Permanent => {
                std::fs::remove_dir_all(path).map_err(|e| deletion_error(e.to_string()))
            }
            DeletionStrategy::Trash => trash::delete(path).map_err(|e| deletion_error(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_delete_directories() {
        let temp_dir = tempdir().unwrap();
        let first = temp_dir.path().join("a").join("node_modules");
        let second = temp_dir.path().join("b").join("node_modules");
        fs::create_dir_all(first.join("pkg")).unwrap();
        fs::write(first.join("pkg").join("index.js"), vec![0u8; 100]).unwrap();
        fs::create_dir_all(&second).unwrap();

        let records = vec![
            MatchRecord::new(first.clone(), 100),
            MatchRecord::new(second.clone(), 0),
        ];
        let mut seen = 0;
        let report = CleanupOperation::new(DeletionStrategy::Permanent)
            .delete_all(&records, |_| seen += 1);

        assert_eq!(seen, 2);
        assert_eq!(report.failed_count(), 0);
        assert_eq!(report.freed_bytes(), 100);
        assert!(!first.exists());
        assert!(!second.exists());
        assert!(temp_dir.path().join("a").exists());
    }

    #[test]
    fn test_failure_does_not_block_remaining() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("gone").join("node_modules");
        let present = temp_dir.path().join("here").join("node_modules");
        fs::create_dir_all(&present).unwrap();

        let records = vec![
            MatchRecord::new(missing.clone(), 500),
            MatchRecord::new(present.clone(), 20),
        ];
        let report = CleanupOperation::new(DeletionStrategy::Permanent).delete_all(&records, |_| {});

        assert_eq!(report.failed_count(), 1);
        assert!(matches!(
            report.outcomes[0].result,
            Err(ScanError::Deletion { .. })
        ));
        assert!(report.outcomes[1].is_success());
        assert_eq!(report.deleted(), vec![MatchRecord::new(present.clone(), 20)]);
        assert_eq!(report.freed_bytes(), 20);
        assert!(!present.exists());
    }
}
