mod cli;

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use cli::{Cli, OutputFormat};
use nukex::config::{Config, DeletionStrategy};
use nukex::models::{DisplayRecord, MatchRecord, ScanOutcome};
use nukex::operations::CleanupOperation;
use nukex::scanner::{ParallelScanner, ScanProgress};
use nukex::tui::{App, Console, SelectionOutcome, Theme};
use nukex::utils::{format_size, shorten_path};

/// JSON 输出格式
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    outcome: &'a ScanOutcome,
    records: Vec<DisplayRecord>,
    total_size_formatted: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志，警告已经由控制台输出，默认只记录错误
    let level = match cli.verbose {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut console = Console::stdout(Theme::from_env());
    match run(cli, &mut console).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = console.error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, console: &mut Console<std::io::Stdout>) -> Result<()> {
    // 加载配置
    let config = Config::load(cli.config.as_deref())?;
    let scan_config = config.scan_config(cli.pattern, cli.max_workers, cli.exclude);
    let strategy = if cli.trash {
        DeletionStrategy::Trash
    } else {
        config.cleanup.strategy
    };
    let json = cli.format == OutputFormat::Json;
    let pattern = scan_config.pattern().to_string();

    if !json {
        console.banner(&pattern)?;
    }

    let scanner = ParallelScanner::new(scan_config);

    // Ctrl+C 只中断扫描，不会进入删除步骤
    let cancel = scanner.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let progress = if json {
        ProgressBar::hidden()
    } else {
        create_progress_bar(&format!("扫描 {}", cli.directory.display()))
    };
    let callback_bar = progress.clone();
    let scan_result = scanner
        .scan_with_progress(&cli.directory, move |p: ScanProgress| {
            let current = p
                .current_path
                .as_deref()
                .map(shorten_path)
                .unwrap_or_default();
            callback_bar.set_message(format!(
                "扫描中 | 子目录: {}/{} | 匹配: {} | {}",
                p.units_finished, p.units_total, p.matches_found, current
            ));
        })
        .await;
    progress.finish_and_clear();
    interrupt.abort();

    let outcome = scan_result?;

    if json {
        let report = JsonReport {
            outcome: &outcome,
            records: outcome.display_records(),
            total_size_formatted: format_size(outcome.total_size()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    console.scan_finished(&outcome.scan_duration_display())?;
    console.warnings(&outcome.warnings)?;

    if outcome.cancelled {
        console.warning("扫描已中断，不会删除任何目录")?;
        return Ok(());
    }

    if outcome.is_empty() {
        console.nothing_found(&pattern)?;
        return Ok(());
    }

    let records = outcome.display_records();
    console.results(&pattern, &records)?;
    console.total("总计", outcome.total_size())?;

    if cli.dry_run {
        console.dim("演示模式，不会删除任何目录")?;
        return Ok(());
    }

    let indices: Vec<usize> = if cli.yes {
        (0..outcome.matches.len()).collect()
    } else {
        if !std::io::stdout().is_terminal() {
            anyhow::bail!("当前不是交互终端，请使用 --yes 或 --dry-run");
        }
        let app = App::new(records, console.theme().clone(), strategy);
        match app.run().await? {
            SelectionOutcome::Confirmed(indices) => indices,
            SelectionOutcome::Cancelled => {
                console.warning("已取消删除，依赖目录仍然保留")?;
                return Ok(());
            }
        }
    };

    if indices.is_empty() {
        console.dim("👋 没有选择任何目录，下次见！")?;
        return Ok(());
    }

    let selected: Vec<MatchRecord> = indices
        .into_iter()
        .filter_map(|i| outcome.matches.get(i).cloned())
        .collect();

    console.deletion_header()?;
    let mut render_error = None;
    let report = CleanupOperation::new(strategy).delete_all(&selected, |deletion| {
        if let Err(err) = console.deletion_outcome(deletion) {
            render_error.get_or_insert(err);
        }
    });
    if let Some(err) = render_error {
        return Err(err.into());
    }

    console.completion(&report)?;
    Ok(())
}

/// 创建进度条
fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
