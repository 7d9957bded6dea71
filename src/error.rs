use std::path::PathBuf;
use thiserror::Error;

/// 扫描与清理过程中的错误类型
///
/// 只有 `InvalidBaseDir`、基础目录的 `Listing` 和 `Config` 是致命错误，
/// 其余错误都被限制在单个子树或单个路径内。
#[derive(Error, Debug)]
pub enum ScanError {
    /// 基础目录不存在或不是目录
    #[error("无效的扫描目录 '{path}': {reason}")]
    InvalidBaseDir { path: PathBuf, reason: String },

    /// 列出目录内容失败
    #[error("无法读取目录 '{path}': {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 子树遍历失败
    #[error("遍历 '{path}' 时出错: {message}")]
    Traversal { path: PathBuf, message: String },

    /// 计算匹配目录大小失败
    #[error("无法计算 '{path}' 的大小: {message}")]
    SizeComputation { path: PathBuf, message: String },

    /// 删除目录失败
    #[error("删除 '{path}' 失败: {message}")]
    Deletion { path: PathBuf, message: String },

    /// 配置文件无法读取或解析
    #[error("配置文件 '{path}' 无效: {message}")]
    Config { path: PathBuf, message: String },

    /// 扫描被用户中断
    #[error("扫描已被中断")]
    Cancelled,
}

impl ScanError {
    /// 从 walkdir 错误构造遍历错误，尽量保留出错的具体路径
    pub fn from_walk(root: &std::path::Path, err: walkdir::Error) -> Self {
        let path = err
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| root.to_path_buf());
        let message = match err.io_error() {
            Some(io_err) => io_err.to_string(),
            None => err.to_string(),
        };
        ScanError::Traversal { path, message }
    }

    /// 出错的路径（如果有）
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ScanError::InvalidBaseDir { path, .. }
            | ScanError::Listing { path, .. }
            | ScanError::Traversal { path, .. }
            | ScanError::SizeComputation { path, .. }
            | ScanError::Deletion { path, .. }
            | ScanError::Config { path, .. } => Some(path),
            ScanError::Cancelled => None,
        }
    }

    /// 是否应当终止整个运行
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidBaseDir { .. } | ScanError::Listing { .. } | ScanError::Config { .. }
        )
    }
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;
