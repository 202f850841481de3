//! # SSSP 赝势族
//!
//! 一个赝势族以唯一标签标识，按插入顺序保存每个元素的一个赝势文件。
//!
//! ## 不变量
//! - 每个元素至多一个赝势记录
//! - `add` 是原子的：任何检查失败时族状态不变
//!
//! ## 依赖关系
//! - 使用 `models/pseudo.rs`
//! - 被 `importer.rs`, `store/`, `models/parameters.rs` 使用

use crate::error::{Result, SsspError};
use crate::models::PseudoRecord;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// SSSP 赝势族
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsspFamily {
    /// 唯一标签
    label: String,

    /// 描述
    #[serde(default)]
    description: Option<String>,

    /// 赝势记录（插入顺序）
    #[serde(default)]
    pseudos: Vec<PseudoRecord>,

    /// 是否已持久化（由仓库设置）
    #[serde(skip)]
    stored: bool,
}

impl SsspFamily {
    /// 创建空的、未持久化的赝势族
    pub fn new(label: impl Into<String>, description: Option<&str>) -> Self {
        SsspFamily {
            label: label.into(),
            description: description.map(str::to_string),
            pseudos: Vec::new(),
            stored: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_stored(&self) -> bool {
        self.stored
    }

    pub(crate) fn mark_stored(&mut self) {
        self.stored = true;
    }

    /// 记录数量
    pub fn count(&self) -> usize {
        self.pseudos.len()
    }

    /// 当前包含的元素集合
    pub fn elements(&self) -> BTreeSet<String> {
        self.pseudos.iter().map(|p| p.element.clone()).collect()
    }

    /// 按插入顺序遍历记录
    pub fn pseudos(&self) -> impl Iterator<Item = &PseudoRecord> {
        self.pseudos.iter()
    }

    /// 添加单个赝势记录
    pub fn add_pseudo(&mut self, record: PseudoRecord) -> Result<()> {
        self.add_pseudos(vec![record])
    }

    /// 批量添加赝势记录
    ///
    /// 元素与族内已有元素重复，或批次内部重复时失败，且不添加任何记录。
    pub fn add_pseudos(&mut self, records: impl IntoIterator<Item = PseudoRecord>) -> Result<()> {
        let records: Vec<PseudoRecord> = records.into_iter().collect();
        let existing = self.elements();
        let mut batch = BTreeSet::new();

        for record in &records {
            if existing.contains(&record.element) {
                return Err(SsspError::DuplicateElement {
                    label: self.label.clone(),
                    element: record.element.clone(),
                });
            }
            if !batch.insert(record.element.as_str()) {
                return Err(SsspError::DuplicateInBatch(record.element.clone()));
            }
        }

        self.pseudos.extend(records);
        Ok(())
    }

    /// 获取指定元素的赝势记录
    pub fn get_pseudo(&self, element: &str) -> Result<&PseudoRecord> {
        self.pseudos
            .iter()
            .find(|p| p.element == element)
            .ok_or_else(|| SsspError::PseudoNotFound {
                label: self.label.clone(),
                element: element.to_string(),
            })
    }
}

impl std::fmt::Display for SsspFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SsspFamily<{}>", self.label)
    }
}
