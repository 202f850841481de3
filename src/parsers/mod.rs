//! # 解析器模块
//!
//! 提供赝势文件格式的解析器。目前只支持 UPF。
//!
//! ## 依赖关系
//! - 被 `importer.rs`, `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: upf

pub mod upf;

use crate::error::{Result, SsspError};
use crate::models::PseudoRecord;

use glob::{MatchOptions, Pattern};
use std::path::Path;

/// 赝势文件名模式（大小写不敏感）
pub const PSEUDO_PATTERN: &str = "*.upf";

/// 文件名是否为赝势文件
pub fn is_pseudo_filename(name: &str) -> bool {
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    Pattern::new(PSEUDO_PATTERN)
        .map(|p| p.matches_with(name, options))
        .unwrap_or(false)
}

/// 从文件路径推断格式并解析
pub fn parse_pseudo_file(path: &Path) -> Result<PseudoRecord> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if is_pseudo_filename(name) {
        upf::parse_upf_file(path)
    } else {
        Err(SsspError::ParseError {
            path: path.display().to_string(),
            reason: "not a UPF file (expected extension .upf or .UPF)".to_string(),
        })
    }
}
