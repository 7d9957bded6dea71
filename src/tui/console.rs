use std::io::{self, Write};

use crate::models::{DisplayRecord, TraversalWarning};
use crate::operations::{CleanupReport, DeletionOutcome};
use crate::tui::theme::{Theme, Tone};
use crate::utils::format_size;

const LOGO: &str = r"
 _   _ _    _ _  ______   __
| \ | | |  | | |/ |  __\ \/ /
|  \| | |  | | ' /| |__ \  /
| . ' | |  | |  < |  __|/  \
| |\  | |__| | . \| |__/ /\ \
|_| \_|\____/|_|\_\____/_/\_\
";

/// 控制台输出 - 负责横幅、结果列表、警告和完成信息
pub struct Console<W: Write> {
    theme: Theme,
    out: W,
}

impl Console<io::Stdout> {
    pub fn stdout(theme: Theme) -> Self {
        Self::new(theme, io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(theme: Theme, out: W) -> Self {
        Self { theme, out }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// 取回内部的输出目标
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        let painted = self.theme.paint(tone, text);
        writeln!(self.out, "{}", painted)
    }

    pub fn banner(&mut self, pattern: &str) -> io::Result<()> {
        writeln!(self.out)?;
        self.line(Tone::Title, LOGO)?;
        self.line(
            Tone::Dim,
            &format!("轻松清理 \"{}\" 目录！", pattern),
        )?;
        writeln!(self.out)
    }

    pub fn scan_finished(&mut self, duration: &str) -> io::Result<()> {
        writeln!(self.out, "💯 扫描完成 ({})", duration)?;
        writeln!(self.out)
    }

    pub fn nothing_found(&mut self, pattern: &str) -> io::Result<()> {
        self.line(Tone::Warning, &format!("🤷 没有找到 {} 目录！", pattern))?;
        self.line(Tone::Success, "项目已经很干净了 ✨")
    }

    /// 列出所有匹配，格式为 `序号 - 路径 (大小)`
    pub fn results(&mut self, pattern: &str, records: &[DisplayRecord]) -> io::Result<()> {
        self.line(
            Tone::Success,
            &format!("🎉 找到 {} 个 {} 目录:", records.len(), pattern),
        )?;
        writeln!(self.out)?;

        for (i, record) in records.iter().enumerate() {
            let path = self.theme.paint(Tone::Path, &record.display_path);
            let size = self
                .theme
                .paint(Tone::Size, &format!("({})", record.formatted_size));
            writeln!(self.out, "  {} - {} {}", i + 1, path, size)?;
        }
        writeln!(self.out)
    }

    pub fn total(&mut self, label: &str, bytes: u64) -> io::Result<()> {
        self.line(
            Tone::Success,
            &format!("💾 {}: {}", label, format_size(bytes)),
        )
    }

    pub fn warnings(&mut self, warnings: &[TraversalWarning]) -> io::Result<()> {
        for warning in warnings {
            self.warning(&warning.to_string())?;
        }
        Ok(())
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        self.line(Tone::Warning, &format!("⚠️  警告: {}", message))
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.line(Tone::Error, &format!("❌ {}", message))
    }

    pub fn dim(&mut self, message: &str) -> io::Result<()> {
        self.line(Tone::Dim, message)
    }

    pub fn deletion_header(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.line(Tone::Success, "🗑️  正在删除目录...")?;
        writeln!(self.out)
    }

    pub fn deletion_outcome(&mut self, outcome: &DeletionOutcome) -> io::Result<()> {
        match &outcome.result {
            Ok(()) => self.line(
                Tone::Success,
                &format!("✅ 已删除 {}", outcome.record.path.display()),
            ),
            Err(err) => self.line(Tone::Error, &format!("❌ {}", err)),
        }
    }

    pub fn completion(&mut self, report: &CleanupReport) -> io::Result<()> {
        let deleted = report.deleted().len();
        writeln!(self.out)?;
        self.line(Tone::Success, "🎉 清理完成！")?;
        self.line(Tone::Success, &format!("✨ 删除了 {} 个目录", deleted))?;
        self.line(
            Tone::Success,
            &format!("💾 释放了 {} 空间", format_size(report.freed_bytes())),
        )?;
        if report.failed_count() > 0 {
            self.line(
                Tone::Warning,
                &format!("⚠️  {} 个目录删除失败", report.failed_count()),
            )?;
        }
        writeln!(self.out)?;
        self.line(Tone::Dim, "感谢使用 Nukex！")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::models::MatchRecord;
    use std::path::PathBuf;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Console<Vec<u8>>) -> io::Result<()>,
    {
        let mut console = Console::new(Theme::plain(), Vec::new());
        f(&mut console).unwrap();
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn test_results_listing() {
        let records = vec![DisplayRecord {
            path: PathBuf::from("/p/a/node_modules"),
            display_path: "a/node_modules".to_string(),
            size_bytes: 2000,
            formatted_size: "1.95 KB".to_string(),
        }];

        let output = render(|c| c.results("node_modules", &records));

        assert!(output.contains("找到 1 个 node_modules 目录"));
        assert!(output.contains("1 - a/node_modules (1.95 KB)"));
    }

    #[test]
    fn test_completion_counts_only_successes() {
        let report = CleanupReport {
            outcomes: vec![
                DeletionOutcome {
                    record: MatchRecord::new(PathBuf::from("a/node_modules"), 2000),
                    result: Ok(()),
                },
                DeletionOutcome {
                    record: MatchRecord::new(PathBuf::from("b/node_modules"), 9000),
                    result: Err(ScanError::Deletion {
                        path: PathBuf::from("b/node_modules"),
                        message: "permission denied".to_string(),
                    }),
                },
            ],
        };

        let output = render(|c| c.completion(&report));

        assert!(output.contains("删除了 1 个目录"));
        assert!(output.contains("释放了 1.95 KB 空间"));
        assert!(output.contains("1 个目录删除失败"));
    }
}
