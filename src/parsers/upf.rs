//! # UPF 赝势格式解析器
//!
//! 只提取 UPF 文件头中的元素符号，不解析赝势数据本身。
//!
//! ## UPF 文件头格式
//! ```text
//! UPF v2:
//! <UPF version="2.0.1">
//!   <PP_HEADER ... element="Si" ... />
//!
//! UPF v1:
//! <PP_HEADER>
//!    0                   Version Number
//!   Si                   Element
//! ...
//! </PP_HEADER>
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `importer.rs` 使用
//! - 使用 `models/element.rs`, `models/pseudo.rs`

use crate::error::{Result, SsspError};
use crate::models::element::normalize_symbol;
use crate::models::PseudoRecord;

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// UPF v2: <PP_HEADER ... element="Xx" ...>
static V2_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<PP_HEADER\b[^>]*?\belement\s*=\s*"\s*([A-Za-z]{1,2})\s*""#).unwrap()
});

/// UPF v1: "  Xx   Element"
static V1_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*([A-Za-z]{1,2})\s+Element\b").unwrap());

/// 解析 UPF 文件，返回赝势记录
pub fn parse_upf_file(path: &Path) -> Result<PseudoRecord> {
    let content = fs::read_to_string(path).map_err(|e| SsspError::ParseError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.upf");

    let element = parse_upf_element(&content).map_err(|reason| SsspError::ParseError {
        path: path.display().to_string(),
        reason,
    })?;

    Ok(PseudoRecord::new(element, filename, content))
}

/// 从 UPF 内容中提取元素符号
pub fn parse_upf_element(content: &str) -> std::result::Result<String, String> {
    let raw = if let Some(caps) = V2_ELEMENT.captures(content) {
        caps[1].to_string()
    } else {
        let header = v1_header(content).ok_or_else(|| "missing <PP_HEADER> section".to_string())?;
        let caps = V1_ELEMENT
            .captures(header)
            .ok_or_else(|| "no element found in <PP_HEADER>".to_string())?;
        caps[1].to_string()
    };

    normalize_symbol(&raw).ok_or_else(|| format!("unknown element symbol '{}'", raw))
}

/// UPF v1 的 <PP_HEADER> ... </PP_HEADER> 区段
fn v1_header(content: &str) -> Option<&str> {
    let start = content.find("<PP_HEADER>")? + "<PP_HEADER>".len();
    let end = content[start..]
        .find("</PP_HEADER>")
        .map(|i| start + i)
        .unwrap_or(content.len());
    Some(&content[start..end])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 最小 UPF v2 文件
    pub(crate) fn upf_v2(element: &str) -> String {
        format!(
            r#"<UPF version="2.0.1">
  <PP_INFO>
    Generated for tests
  </PP_INFO>
  <PP_HEADER
     generated="test"
     element="{}"
     pseudo_type="NC"
     z_valence="2.0"/>
  <PP_MESH/>
</UPF>
"#,
            element
        )
    }

    /// 最小 UPF v1 文件
    pub(crate) fn upf_v1(element: &str) -> String {
        format!(
            r#"<PP_INFO>
  Generated for tests
</PP_INFO>
<PP_HEADER>
   0                   Version Number
  {}                   Element
   NC                  Norm - Conserving pseudopotential
</PP_HEADER>
"#,
            element
        )
    }

    #[test]
    fn test_parse_v2() {
        assert_eq!(parse_upf_element(&upf_v2("Si")).unwrap(), "Si");
        assert_eq!(parse_upf_element(&upf_v2("he")).unwrap(), "He");
    }

    #[test]
    fn test_parse_v1() {
        assert_eq!(parse_upf_element(&upf_v1("Ar")).unwrap(), "Ar");
        assert_eq!(parse_upf_element(&upf_v1("O")).unwrap(), "O");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_upf_element("invalid pseudo format").is_err());
        assert!(parse_upf_element(&upf_v2("Qq")).is_err());
        assert!(parse_upf_element("<PP_HEADER>\n</PP_HEADER>").is_err());
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Ne.pbe.UPF");
        fs::write(&path, upf_v2("Ne")).unwrap();

        let record = parse_upf_file(&path).unwrap();
        assert_eq!(record.element, "Ne");
        assert_eq!(record.filename, "Ne.pbe.UPF");
        assert!(record.verify());

        fs::write(&path, "invalid pseudo format").unwrap();
        let err = parse_upf_file(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
