//! # 赝势文件记录
//!
//! 单个赝势文件解析后的数据：元素、文件名、内容与校验和。
//!
//! ## 依赖关系
//! - 被 `parsers/upf.rs` 创建
//! - 被 `models/family.rs` 持有

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// 赝势文件记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoRecord {
    /// 元素符号
    pub element: String,

    /// 源文件名（不含目录）
    pub filename: String,

    /// 文件内容
    pub content: String,

    /// 内容的 SHA-256 (hex)
    pub checksum: String,
}

impl PseudoRecord {
    pub fn new(
        element: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        let checksum = sha256_hex(content.as_bytes());
        PseudoRecord {
            element: element.into(),
            filename: filename.into(),
            content,
            checksum,
        }
    }

    /// 内容是否与记录的校验和一致
    pub fn verify(&self) -> bool {
        sha256_hex(self.content.as_bytes()) == self.checksum
    }
}

fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        let record = PseudoRecord::new("He", "He.upf", "abc");
        assert_eq!(
            record.checksum,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(record.verify());

        let mut tampered = record.clone();
        tampered.content.push('d');
        assert!(!tampered.verify());
    }
}
