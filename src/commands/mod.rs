//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config.rs`, `store/`, `importer.rs`, `selector/`, `utils/`
//! - 子模块: family, params, select

pub mod family;
pub mod params;
pub mod select;

use crate::cli::Commands;
use crate::config::Settings;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands, settings: &Settings) -> Result<()> {
    match cmd {
        Commands::Family(args) => family::execute(args, settings),
        Commands::Params(args) => params::execute(args, settings),
        Commands::Select(args) => select::execute(args, settings),
    }
}
