//! # select 子命令 CLI 定义
//!
//! 选择 SSSP 族，未安装时可从镜像安装。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/select.rs`

use clap::Args;

/// select 子命令参数
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// SSSP version (1.0 or 1.1)
    #[arg(long = "sssp-version")]
    pub version: Option<String>,

    /// Exchange-correlation functional (PBE or PBEsol)
    #[arg(long)]
    pub functional: Option<String>,

    /// Library (efficiency or precision)
    #[arg(long)]
    pub library: Option<String>,

    /// Install the family from the mirror if it is missing
    #[arg(long, default_value_t = false)]
    pub install: bool,
}
