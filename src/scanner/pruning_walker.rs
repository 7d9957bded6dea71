use std::path::Path;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};

/// 对单个条目的处理决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDecision {
    /// 继续向下遍历
    Descend,

    /// 报告为匹配，并且不再进入其子目录
    Report,

    /// 静默跳过，不进入其子目录
    Prune,
}

/// 遍历规则
pub trait WalkRules: Send + Sync {
    /// 名称是否被排除
    fn is_excluded(&self, name: &str) -> bool;

    /// 名称是否匹配
    fn is_match(&self, name: &str) -> bool;

    /// 根据条目名称和类型做出决定，排除优先于匹配，只有目录会被匹配
    fn decide(&self, name: &str, is_dir: bool) -> WalkDecision {
        if self.is_excluded(name) {
            WalkDecision::Prune
        } else if is_dir && self.is_match(name) {
            WalkDecision::Report
        } else {
            WalkDecision::Descend
        }
    }
}

impl WalkRules for ScanConfig {
    fn is_excluded(&self, name: &str) -> bool {
        self.excluded_names().contains(name)
    }

    fn is_match(&self, name: &str) -> bool {
        name.contains(self.pattern())
    }
}

/// 单次遍历的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub visited: usize,
    pub matched: usize,
    pub pruned: usize,
}

/// 带剪枝的深度优先遍历器
///
/// 根目录本身与其他条目一样参与排除和匹配判断。
pub struct PruningWalker<'a, R: WalkRules + ?Sized> {
    rules: &'a R,
    cancel: Option<&'a CancellationToken>,
}

impl<'a, R: WalkRules + ?Sized> PruningWalker<'a, R> {
    pub fn new(rules: &'a R) -> Self {
        Self {
            rules,
            cancel: None,
        }
    }

    /// 每访问一个条目都检查一次取消信号
    pub fn with_cancellation(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// 从 `root` 开始遍历，每发现一个匹配目录调用一次 `on_match`
    ///
    /// 遇到 I/O 错误时立即停止并返回错误；已经报告过的匹配不受影响。
    pub fn walk<F>(&self, root: &Path, mut on_match: F) -> ScanResult<WalkSummary>
    where
        F: FnMut(&Path),
    {
        let mut summary = WalkSummary::default();
        // 根目录是符号链接时同样不跟随，只把链接本身当作一个条目
        let mut entries = WalkDir::new(root)
            .follow_links(false)
            .follow_root_links(false)
            .into_iter();

        while let Some(entry) = entries.next() {
            if self.cancel.is_some_and(|token| token.is_cancelled()) {
                return Err(ScanError::Cancelled);
            }

            let entry = entry.map_err(|err| ScanError::from_walk(root, err))?;
            summary.visited += 1;

            let name = entry.file_name().to_string_lossy();
            let is_dir = entry.file_type().is_dir();

            match self.rules.decide(&name, is_dir) {
                WalkDecision::Descend => {}
                WalkDecision::Report => {
                    tracing::debug!("发现匹配目录: {}", entry.path().display());
                    summary.matched += 1;
                    on_match(entry.path());
                    entries.skip_current_dir();
                }
                WalkDecision::Prune => {
                    summary.pruned += 1;
                    // 对文件调用 skip_current_dir 会跳过其所在目录的剩余条目
                    if is_dir {
                        entries.skip_current_dir();
                    }
                }
            }
        }

        Ok(summary)
    }
}
