use std::path::{Component, Path, PathBuf};

/// 超过该长度的路径会被从中间截断
const MAX_DISPLAY_LENGTH: usize = 50;
const KEEP_PREFIX: usize = 15;
const KEEP_SUFFIX: usize = 30;

/// 返回适合显示的短路径
///
/// 相对于当前工作目录的路径更短时使用相对路径，超长时从中间截断。
pub fn shorten_path(path: &Path) -> String {
    let cwd = std::env::current_dir().ok();
    shorten_path_from(path, cwd.as_deref())
}

/// 同 [`shorten_path`]，但显式指定参照目录
pub fn shorten_path_from(path: &Path, cwd: Option<&Path>) -> String {
    let mut display = path.display().to_string();

    if let Some(rel) = cwd.and_then(|cwd| relative_to(path, cwd)) {
        let rel = rel.display().to_string();
        if rel.len() < display.len() {
            display = rel;
        }
    }

    truncate_middle(&display)
}

/// 从中间截断字符串，保留开头和结尾
pub fn truncate_middle(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= MAX_DISPLAY_LENGTH {
        return text.to_string();
    }

    let start: String = chars[..KEEP_PREFIX].iter().collect();
    let end: String = chars[chars.len() - KEEP_SUFFIX..].iter().collect();
    format!("{}...{}", start, end)
}

/// 计算 `path` 相对于 `base` 的路径，两者都必须是绝对路径
fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if !path.is_absolute() || !base.is_absolute() {
        return None;
    }

    let path_components: Vec<Component> = path.components().collect();
    let base_components: Vec<Component> = base.components().collect();

    let common = path_components
        .iter()
        .zip(base_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // 没有共同的根（例如 Windows 上的不同盘符）
    if common == 0 {
        return None;
    }

    let mut rel = PathBuf::new();
    for _ in common..base_components.len() {
        rel.push("..");
    }
    for component in &path_components[common..] {
        rel.push(component.as_os_str());
    }

    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}
