use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::defaults::DefaultConfig;
use crate::error::{ScanError, ScanResult};

/// 配置文件内容，所有字段都可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 扫描配置
    pub scan: FileScanConfig,

    /// 清理配置
    pub cleanup: CleanupConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScanConfig {
    /// 要匹配的目录名子串
    pub pattern: Option<String>,

    /// 最大并发遍历数
    pub max_workers: Option<usize>,

    /// 不进入的目录名
    pub excluded_names: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// 删除方式
    pub strategy: DeletionStrategy,
}

/// 删除方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionStrategy {
    /// 直接递归删除，无法恢复
    #[default]
    Permanent,

    /// 移动到系统回收站
    Trash,
}

/// 一次扫描的只读配置
///
/// 构造后不再修改，所有工作线程共享同一份，因此不需要加锁。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pattern: String,
    max_workers: usize,
    excluded_names: BTreeSet<String>,
}

impl ScanConfig {
    /// 创建扫描配置，空值回退到默认值
    pub fn new<I, S>(pattern: impl Into<String>, max_workers: usize, excluded_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pattern = pattern.into();
        if pattern.is_empty() {
            pattern = DefaultConfig::PATTERN.to_string();
        }

        let max_workers = if max_workers == 0 {
            DefaultConfig::MAX_WORKERS
        } else {
            max_workers
        };

        let mut excluded_names: BTreeSet<String> =
            excluded_names.into_iter().map(Into::into).collect();
        if excluded_names.is_empty() {
            excluded_names = DefaultConfig::default_excluded_names();
        }

        Self {
            pattern,
            max_workers,
            excluded_names,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn excluded_names(&self) -> &BTreeSet<String> {
        &self.excluded_names
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new("", 0, Vec::<String>::new())
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> ScanResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ScanError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push(DefaultConfig::APP_DIR);
        path.push(DefaultConfig::CONFIG_FILE);
        Some(path)
    }

    /// 加载配置
    ///
    /// 显式指定的文件必须存在；默认位置的文件不存在时使用内置默认值。
    pub fn load(explicit: Option<&Path>) -> ScanResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!("使用配置文件: {}", path.display());
                Self::load_from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// 合并命令行参数，得到最终扫描配置
    ///
    /// 优先级：命令行 > 配置文件 > 内置默认值。
    pub fn scan_config(
        &self,
        pattern: Option<String>,
        max_workers: Option<usize>,
        excluded_names: Vec<String>,
    ) -> ScanConfig {
        let pattern = pattern
            .or_else(|| self.scan.pattern.clone())
            .unwrap_or_default();
        let max_workers = max_workers.or(self.scan.max_workers).unwrap_or(0);
        let excluded_names: Vec<String> = if excluded_names.is_empty() {
            self.scan
                .excluded_names
                .as_ref()
                .map(|names| names.iter().cloned().collect())
                .unwrap_or_default()
        } else {
            excluded_names
        };

        ScanConfig::new(pattern, max_workers, excluded_names)
    }
}
