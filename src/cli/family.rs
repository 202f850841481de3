//! # family 子命令 CLI 定义
//!
//! 赝势族的创建、列表、查看与扩展。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/family.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// family 主命令参数
#[derive(Args, Debug)]
pub struct FamilyArgs {
    #[command(subcommand)]
    pub command: FamilyCommands,
}

/// family 子命令
#[derive(Subcommand, Debug)]
pub enum FamilyCommands {
    /// Create a family from a directory of UPF files
    Create(CreateArgs),

    /// List installed families
    List(ListArgs),

    /// Show the pseudos of a family
    Show(ShowArgs),

    /// Add UPF files to an existing family
    Add(AddArgs),

    /// Print the pseudo of a family for one element
    Pseudo(PseudoArgs),
}

/// create 参数
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory containing one .upf/.UPF file per element
    pub dir: PathBuf,

    /// Unique label of the new family
    #[arg(short, long)]
    pub label: String,

    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// list 参数
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only families of this SSSP version (e.g., 1.1)
    #[arg(long = "sssp-version")]
    pub version: Option<String>,

    /// Only families of this functional (e.g., PBE)
    #[arg(long)]
    pub functional: Option<String>,

    /// Only families of this library (efficiency or precision)
    #[arg(long)]
    pub library: Option<String>,
}

/// show 参数
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Family label
    pub label: String,

    /// Also write the table to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// add 参数
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Family label
    pub label: String,

    /// UPF files to add
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// pseudo 参数
#[derive(Args, Debug)]
pub struct PseudoArgs {
    /// Family label
    pub label: String,

    /// Element symbol
    pub element: String,

    /// Write the pseudo content to this file instead of printing a summary
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
