use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nukex")]
#[command(about = "查找并清理 node_modules 之类的依赖目录")]
#[command(version)]
pub struct Cli {
    /// 要扫描的目录
    pub directory: PathBuf,

    /// 要匹配的目录名（子串匹配，默认 node_modules）
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 最大并发遍历数（默认 20）
    #[arg(short = 'w', long)]
    pub max_workers: Option<usize>,

    /// 不进入的目录名，可重复指定，会替换默认列表
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// 只扫描和列出结果，不删除
    #[arg(long)]
    pub dry_run: bool,

    /// 移动到回收站而不是直接删除
    #[arg(long)]
    pub trash: bool,

    /// 选中全部结果并跳过确认
    #[arg(short, long)]
    pub yes: bool,

    /// 详细输出，重复使用可输出调试日志
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// 表格格式
    Table,
    /// JSON 格式
    Json,
}
