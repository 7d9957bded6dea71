use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::models::{MatchRecord, ScanOutcome, TraversalWarning};
use crate::scanner::pruning_walker::{PruningWalker, WalkSummary};
use crate::scanner::size_calculator::SizeCalculator;

/// 并发目录扫描器
///
/// 基础目录的每个直接子项作为一个遍历任务，由容量为 `max_workers` 的信号量限制
/// 同时运行的任务数。匹配结果通过通道汇总，所有任务结束后才返回。
pub struct ParallelScanner {
    config: Arc<ScanConfig>,
    cancel: CancellationToken,
}

/// 扫描进度信息
#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    /// 总任务数
    pub units_total: usize,

    /// 已完成的任务数
    pub units_finished: usize,

    /// 已发现的匹配数
    pub matches_found: usize,

    /// 最近处理的路径
    pub current_path: Option<PathBuf>,
}

/// 正在运行的任务计数，离开作用域时自动减一
struct InFlight {
    active: Arc<AtomicUsize>,
}

impl InFlight {
    fn enter(active: &Arc<AtomicUsize>, peak: &AtomicUsize) -> Self {
        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self {
            active: Arc::clone(active),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 各任务共享的计数器
#[derive(Default)]
struct Counters {
    active: Arc<AtomicUsize>,
    peak: AtomicUsize,
    finished: AtomicUsize,
    matches: AtomicUsize,
}

impl ParallelScanner {
    /// 创建新的并发扫描器
    pub fn new(config: ScanConfig) -> Self {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// 使用外部取消令牌创建扫描器
    pub fn with_cancellation(config: ScanConfig, cancel: CancellationToken) -> Self {
        Self {
            config: Arc::new(config),
            cancel,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// 获取取消令牌，取消后正在运行的遍历会在下一个条目处停止
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 扫描基础目录
    pub async fn scan(&self, base_dir: &Path) -> ScanResult<ScanOutcome> {
        self.scan_with_progress(base_dir, |_| {}).await
    }

    /// 扫描基础目录，并在每个任务完成或发现匹配时回调进度
    pub async fn scan_with_progress<F>(
        &self,
        base_dir: &Path,
        progress_callback: F,
    ) -> ScanResult<ScanOutcome>
    where
        F: Fn(ScanProgress) + Send + Sync + 'static,
    {
        validate_base_dir(base_dir).await?;
        let children = list_children(base_dir).await?;

        let mut outcome = ScanOutcome::new(base_dir.to_path_buf());
        let units_total = children.len();
        tracing::debug!(
            "开始扫描 {}: {} 个子项, 最大并发 {}",
            base_dir.display(),
            units_total,
            self.config.max_workers()
        );

        let progress_callback = Arc::new(progress_callback);
        let semaphore = Arc::new(Semaphore::new(self.config.max_workers()));
        let counters = Arc::new(Counters::default());
        let (tx, mut rx) = mpsc::unbounded_channel::<MatchRecord>();
        let mut tasks = Vec::with_capacity(units_total);

        for child in children {
            // 获取许可后才派发，超出容量的任务在此等待
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let child_name = child
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| child.display().to_string());
            let config = Arc::clone(&self.config);
            let cancel = self.cancel.clone();
            let counters = Arc::clone(&counters);
            let progress_callback = Arc::clone(&progress_callback);
            let tx = tx.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let _in_flight = InFlight::enter(&counters.active, &counters.peak);

                let result = walk_unit(&child, &config, &cancel, |record| {
                    let found = counters.matches.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(ScanProgress {
                        units_total,
                        units_finished: counters.finished.load(Ordering::SeqCst),
                        matches_found: found,
                        current_path: Some(record.path.clone()),
                    });
                    // 接收端在所有任务结束前不会关闭
                    let _ = tx.send(record);
                });

                let finished = counters.finished.fetch_add(1, Ordering::SeqCst) + 1;
                progress_callback(ScanProgress {
                    units_total,
                    units_finished: finished,
                    matches_found: counters.matches.load(Ordering::SeqCst),
                    current_path: Some(child.clone()),
                });

                result
            });
            tasks.push((child_name, handle));
        }
        drop(tx);

        outcome.stats.units_dispatched = tasks.len();
        let (names, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        for (child, joined) in names.into_iter().zip(results) {
            match joined {
                Ok(Ok(summary)) => {
                    tracing::debug!(
                        "{} 遍历完成: 访问 {} 项, 匹配 {} 项, 跳过 {} 项",
                        child,
                        summary.visited,
                        summary.matched,
                        summary.pruned
                    );
                }
                Ok(Err(ScanError::Cancelled)) => {
                    outcome.cancelled = true;
                }
                Ok(Err(err)) => {
                    let warning = TraversalWarning {
                        path: err
                            .path()
                            .map(Path::to_path_buf)
                            .unwrap_or_else(|| base_dir.join(&child)),
                        message: err.to_string(),
                        child,
                    };
                    tracing::warn!("{}", warning);
                    outcome.stats.units_failed += 1;
                    outcome.warnings.push(warning);
                }
                Err(join_err) => {
                    let warning = TraversalWarning {
                        path: base_dir.join(&child),
                        message: format!("遍历任务异常退出: {}", join_err),
                        child,
                    };
                    tracing::warn!("{}", warning);
                    outcome.stats.units_failed += 1;
                    outcome.warnings.push(warning);
                }
            }
        }

        while let Some(record) = rx.recv().await {
            outcome.matches.push(record);
        }

        if self.cancel.is_cancelled() {
            outcome.cancelled = true;
        }
        outcome.stats.peak_concurrency = counters.peak.load(Ordering::SeqCst);
        outcome.finish_scan();

        tracing::info!(
            "扫描完成: {} 个匹配, {} 个警告, 耗时 {}",
            outcome.matches.len(),
            outcome.warnings.len(),
            outcome.scan_duration_display()
        );

        Ok(outcome)
    }
}

/// 遍历单个顶层子项，对每个匹配计算大小后交给 `emit`
fn walk_unit<F>(
    root: &Path,
    config: &ScanConfig,
    cancel: &CancellationToken,
    mut emit: F,
) -> ScanResult<WalkSummary>
where
    F: FnMut(MatchRecord),
{
    let calculator = SizeCalculator::new();

    PruningWalker::new(config)
        .with_cancellation(cancel)
        .walk(root, |path| {
            let record = match calculator.calculate_directory_size(path) {
                Ok(info) => {
                    tracing::debug!(
                        "{}: {} 个文件, {} 字节",
                        info.path.display(),
                        info.file_count,
                        info.size
                    );
                    MatchRecord::new(info.path, info.size)
                }
                Err(err) => {
                    tracing::warn!("{}", err);
                    MatchRecord::unknown_size(path.to_path_buf())
                }
            };
            emit(record);
        })
}

/// 检查基础目录是否存在且为目录
pub async fn validate_base_dir(base_dir: &Path) -> ScanResult<()> {
    let metadata = tokio::fs::metadata(base_dir)
        .await
        .map_err(|err| ScanError::InvalidBaseDir {
            path: base_dir.to_path_buf(),
            reason: if err.kind() == std::io::ErrorKind::NotFound {
                "目录不存在".to_string()
            } else {
                err.to_string()
            },
        })?;

    if !metadata.is_dir() {
        return Err(ScanError::InvalidBaseDir {
            path: base_dir.to_path_buf(),
            reason: "不是有效的目录".to_string(),
        });
    }

    Ok(())
}

/// 列出基础目录的直接子项
async fn list_children(base_dir: &Path) -> ScanResult<Vec<PathBuf>> {
    let listing_error = |source| ScanError::Listing {
        path: base_dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(base_dir).await.map_err(listing_error)?;
    let mut children = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(listing_error)? {
        children.push(entry.path());
    }

    Ok(children)
}
