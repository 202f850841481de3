//! # params 子命令 CLI 定义
//!
//! 导入与查看推荐截断参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/params.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// params 主命令参数
#[derive(Args, Debug)]
pub struct ParamsArgs {
    #[command(subcommand)]
    pub command: ParamsCommands,
}

/// params 子命令
#[derive(Subcommand, Debug)]
pub enum ParamsCommands {
    /// Attach parameters from a JSON file to a stored family
    Import(ImportArgs),

    /// Show the parameters attached to a family
    Show(ShowParamsArgs),
}

/// import 参数
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON file mapping element -> {cutoff_wfc, cutoff_rho, filename, md5}
    pub file: PathBuf,

    /// Label of the target family
    #[arg(short, long)]
    pub family: String,
}

/// show 参数
#[derive(Args, Debug)]
pub struct ShowParamsArgs {
    /// Label of the family
    pub family: String,

    /// Only this element
    #[arg(short, long)]
    pub element: Option<String>,

    /// Also write the table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
