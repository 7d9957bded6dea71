use std::collections::BTreeSet;

pub struct DefaultConfig;

impl DefaultConfig {
    /// 默认匹配的目录名
    pub const PATTERN: &'static str = "node_modules";

    /// 默认最大并发遍历数
    pub const MAX_WORKERS: usize = 20;

    /// 配置目录下的应用目录名
    pub const APP_DIR: &'static str = "nukex";

    /// 配置文件名
    pub const CONFIG_FILE: &'static str = "config.toml";

    /// 默认不进入的目录名
    pub fn default_excluded_names() -> BTreeSet<String> {
        let mut names = BTreeSet::new();

        // 特殊目录项
        names.insert(".".to_string());
        names.insert("..".to_string());

        // Python 虚拟环境
        names.insert(".venv".to_string());
        names.insert("venv".to_string());

        // 包管理器与版本控制
        names.insert(".yarn".to_string());
        names.insert(".git".to_string());

        names
    }
}
