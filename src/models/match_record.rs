use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 匹配到的目录及其占用空间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// 匹配目录路径
    pub path: PathBuf,

    /// 目录下所有普通文件的大小之和
    pub size_bytes: u64,

    /// 大小计算失败时为 true，此时 `size_bytes` 为 0
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub size_unknown: bool,
}

impl MatchRecord {
    pub fn new(path: PathBuf, size_bytes: u64) -> Self {
        Self {
            path,
            size_bytes,
            size_unknown: false,
        }
    }

    /// 大小未知的匹配记录
    pub fn unknown_size(path: PathBuf) -> Self {
        Self {
            path,
            size_bytes: 0,
            size_unknown: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 可直接显示的匹配记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub path: PathBuf,
    pub display_path: String,
    pub size_bytes: u64,
    pub formatted_size: String,
}

/// 遍历某个顶层子目录时产生的非致命错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalWarning {
    /// 出错的顶层子目录名
    pub child: String,

    /// 实际出错的路径
    pub path: PathBuf,

    /// 错误信息
    pub message: String,
}

impl std::fmt::Display for TraversalWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "处理路径 {:?} 时出错 ({}): {}",
            self.child,
            self.path.display(),
            self.message
        )
    }
}
