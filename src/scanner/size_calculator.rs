use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ScanError, ScanResult};

/// 大小计算器 - 负责计算匹配目录的磁盘占用
///
/// 只累加普通文件的大小，目录本身不计入。符号链接不会被跟随，
/// 也不计入大小，因此不会因为链接成环而陷入死循环。
#[derive(Debug, Clone, Default)]
pub struct SizeCalculator;

/// 目录大小统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySizeInfo {
    /// 目录路径
    pub path: PathBuf,

    /// 目录大小
    pub size: u64,

    /// 文件数量
    pub file_count: usize,
}

impl SizeCalculator {
    /// 创建新的大小计算器
    pub fn new() -> Self {
        Self
    }

    /// 计算指定目录的大小
    ///
    /// 任何一项读取失败（权限不足、文件在遍历中被删除等）都会让整个计算失败，
    /// 如何降级由调用方决定。
    pub fn calculate_directory_size(&self, dir_path: &Path) -> ScanResult<DirectorySizeInfo> {
        let mut total_size = 0u64;
        let mut file_count = 0usize;

        let walker = WalkDir::new(dir_path)
            .follow_links(false)
            .follow_root_links(false);

        for entry in walker {
            let entry = entry.map_err(|err| size_error(dir_path, err))?;

            if entry.file_type().is_file() {
                let metadata = entry.metadata().map_err(|err| size_error(dir_path, err))?;
                total_size = total_size.saturating_add(metadata.len());
                file_count += 1;
            }
        }

        Ok(DirectorySizeInfo {
            path: dir_path.to_path_buf(),
            size: total_size,
            file_count,
        })
    }
}

fn size_error(dir_path: &Path, err: walkdir::Error) -> ScanError {
    let path = err
        .path()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| dir_path.to_path_buf());
    ScanError::SizeComputation {
        path,
        message: err.to_string(),
    }
}
