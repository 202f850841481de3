//! # SSSP 族目录
//!
//! 已知的 (version, functional, library) 组合及其标签、存档名与描述。
//!
//! ## 命名
//! ```text
//! 标签:   SSSP/1.1/PBE/efficiency
//! 存档名: SSSP_1.1_PBE_efficiency
//! ```
//!
//! ## 依赖关系
//! - 被 `selector/mod.rs`, `selector/installer.rs`, `commands/` 使用

use crate::error::{Result, SsspError};

/// 标签前缀
pub const LABEL_PREFIX: &str = "SSSP";

const VERSIONS: [&str; 2] = ["1.0", "1.1"];
const FUNCTIONALS: [&str; 2] = ["PBE", "PBEsol"];
const LIBRARIES: [&str; 2] = ["efficiency", "precision"];

/// 一个 SSSP 族的选择
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FamilyChoice {
    pub version: String,
    pub functional: String,
    pub library: String,
}

impl FamilyChoice {
    /// 创建并校验选择，functional/library 大小写不敏感
    pub fn new(version: &str, functional: &str, library: &str) -> Result<Self> {
        let canonical = |options: &[&str], value: &str| {
            options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(value.trim()))
                .map(|o| o.to_string())
        };

        match (
            canonical(&VERSIONS[..], version),
            canonical(&FUNCTIONALS[..], functional),
            canonical(&LIBRARIES[..], library),
        ) {
            (Some(version), Some(functional), Some(library)) => Ok(FamilyChoice {
                version,
                functional,
                library,
            }),
            _ => Err(SsspError::UnknownFamilyChoice(format!(
                "{} {} {}",
                version, functional, library
            ))),
        }
    }

    /// 全部已知选择
    pub fn catalog() -> Vec<FamilyChoice> {
        let mut choices = Vec::new();
        for version in VERSIONS {
            for functional in FUNCTIONALS {
                for library in LIBRARIES {
                    choices.push(FamilyChoice {
                        version: version.to_string(),
                        functional: functional.to_string(),
                        library: library.to_string(),
                    });
                }
            }
        }
        choices
    }

    /// 从族标签还原选择；不符合命名规则时返回 None
    pub fn from_label(label: &str) -> Option<Self> {
        let parts: Vec<&str> = label.split('/').collect();
        match parts.as_slice() {
            [prefix, version, functional, library] if *prefix == LABEL_PREFIX => {
                Self::new(version, functional, library).ok()
            }
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            LABEL_PREFIX, self.version, self.functional, self.library
        )
    }

    pub fn archive_name(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            LABEL_PREFIX, self.version, self.functional, self.library
        )
    }

    pub fn description(&self) -> String {
        format!(
            "SSSP v{} {} {} installed with ssspkit v{}",
            self.version,
            self.functional,
            self.library,
            env!("CARGO_PKG_VERSION")
        )
    }
}

impl std::fmt::Display for FamilyChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SSSP {} {} {}", self.version, self.functional, self.library)
    }
}
