//! # ssspkit - SSSP 赝势族管理工具
//!
//! 管理 SSSP 赝势族及其推荐截断能，统一成单一可执行文件。
//!
//! ## 子命令
//! - `family` - 赝势族管理
//!   - `create` - 从 UPF 目录创建族
//!   - `list` / `show` / `pseudo` - 查看
//!   - `add` - 向已有族添加赝势
//! - `params` - 推荐参数的导入与查看
//! - `select` - 选择 SSSP 族，必要时从镜像安装
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── importer.rs (目录导入)
//!   │     ├── selector/   (族选择状态机)
//!   │     ├── store/      (族与参数仓库)
//!   │     ├── parsers/    (UPF 解析器)
//!   │     └── models/     (数据模型)
//!   ├── config.rs   (运行配置)
//!   ├── logging.rs  (诊断日志)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod config;
mod error;
mod importer;
mod logging;
mod models;
mod parsers;
mod selector;
mod store;
mod utils;

use clap::Parser;
use cli::Cli;
use config::Settings;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let result = logging::setup_logging(
        cli.global.verbose,
        cli.global.quiet,
        cli.global.log_file.as_deref(),
    )
    .and_then(|_| Settings::from_args(&cli.global))
    .and_then(|settings| commands::run(cli.command, &settings));

    if let Err(e) = result {
        tracing::debug!(kind = ?e.kind(), "command failed");
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
