//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `family`: 赝势族管理（嵌套子命令）
//!   - `create`, `list`, `show`, `add`, `pseudo`
//! - `params`: 推荐参数（嵌套子命令）
//!   - `import`, `show`
//! - `select`: 选择（必要时安装）一个 SSSP 族
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: family, params, select

pub mod family;
pub mod params;
pub mod select;

use crate::config::{MIRROR_ENV, STORE_ENV};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ssspkit - SSSP 赝势族管理工具
#[derive(Parser)]
#[command(name = "ssspkit")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Manage SSSP pseudopotential families and their recommended cutoffs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// 全局参数
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory of the family store
    #[arg(long, global = true, env = STORE_ENV)]
    pub store: Option<PathBuf>,

    /// Local mirror directory holding SSSP archives
    #[arg(long, global = true, env = MIRROR_ENV)]
    pub mirror: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Create, inspect and extend pseudopotential families
    Family(family::FamilyArgs),

    /// Import and inspect recommended cutoff parameters
    Params(params::ParamsArgs),

    /// Select an SSSP family, installing it from the mirror if needed
    Select(select::SelectArgs),
}
