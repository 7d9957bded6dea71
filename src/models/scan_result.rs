use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{DisplayRecord, MatchRecord, TraversalWarning};
use crate::utils::{format_size, shorten_path};

/// 一次扫描的完整结果
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// 扫描的根路径
    pub base_dir: PathBuf,

    /// 匹配列表，顺序为各工作线程完成的顺序，不保证稳定
    pub matches: Vec<MatchRecord>,

    /// 非致命的遍历错误
    pub warnings: Vec<TraversalWarning>,

    /// 扫描统计信息
    pub stats: ScanStats,

    /// 扫描开始时间
    pub scan_start_time: DateTime<Utc>,

    /// 扫描结束时间
    pub scan_end_time: Option<DateTime<Utc>>,

    /// 是否被中断
    pub cancelled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    /// 派发的遍历任务数（基础目录的直接子项数）
    pub units_dispatched: usize,

    /// 遍历失败的任务数
    pub units_failed: usize,

    /// 同时运行的遍历任务峰值
    pub peak_concurrency: usize,

    /// 匹配总大小
    pub total_size: u64,

    /// 扫描耗时
    pub scan_duration: Option<Duration>,
}

impl ScanOutcome {
    /// 创建新的扫描结果
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            matches: Vec::new(),
            warnings: Vec::new(),
            stats: ScanStats::default(),
            scan_start_time: Utc::now(),
            scan_end_time: None,
            cancelled: false,
        }
    }

    /// 完成扫描
    pub fn finish_scan(&mut self) {
        let end_time = Utc::now();
        self.scan_end_time = Some(end_time);
        self.stats.total_size = total_size(&self.matches);
        self.stats.scan_duration = end_time
            .signed_duration_since(self.scan_start_time)
            .to_std()
            .ok();
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        total_size(&self.matches)
    }

    /// 使用默认格式生成显示记录
    pub fn display_records(&self) -> Vec<DisplayRecord> {
        format_all(&self.matches, format_size, shorten_path)
    }

    /// 获取扫描耗时的友好显示
    pub fn scan_duration_display(&self) -> String {
        match self.stats.scan_duration {
            Some(duration) => {
                let millis = duration.as_millis();
                if millis < 1000 {
                    format!("{}ms", millis)
                } else if millis < 60_000 {
                    format!("{:.1}s", duration.as_secs_f64())
                } else {
                    let seconds = duration.as_secs();
                    format!("{}m {}s", seconds / 60, seconds % 60)
                }
            }
            None => "进行中...".to_string(),
        }
    }
}

/// 将原始匹配记录转换为显示记录
pub fn format_all<S, P>(records: &[MatchRecord], size_fmt: S, path_fmt: P) -> Vec<DisplayRecord>
where
    S: Fn(u64) -> String,
    P: Fn(&Path) -> String,
{
    records
        .iter()
        .map(|record| DisplayRecord {
            path: record.path.clone(),
            display_path: path_fmt(&record.path),
            size_bytes: record.size_bytes,
            formatted_size: if record.size_unknown {
                "未知".to_string()
            } else {
                size_fmt(record.size_bytes)
            },
        })
        .collect()
}

/// 匹配记录的总大小
pub fn total_size(records: &[MatchRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |acc, record| acc.saturating_add(record.size_bytes))
}
