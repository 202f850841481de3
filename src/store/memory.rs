//! # 内存仓库
//!
//! 不落盘的 [`Repository`] 实现，用于测试和一次性操作。
//!
//! ## 依赖关系
//! - 实现 `store/mod.rs` 的 `Repository`

use super::{ensure_extension, ensure_family_exists, Repository};
use crate::error::{Result, SsspError};
use crate::models::{SsspFamily, SsspParameters};

use std::collections::BTreeMap;

/// 内存仓库
#[derive(Debug, Default)]
pub struct MemoryStore {
    families: BTreeMap<String, SsspFamily>,
    parameters: Vec<SsspParameters>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository for MemoryStore {
    fn insert_family(&mut self, family: &mut SsspFamily) -> Result<()> {
        if self.families.contains_key(family.label()) {
            return Err(SsspError::DuplicateLabel(family.label().to_string()));
        }
        family.mark_stored();
        self.families
            .insert(family.label().to_string(), family.clone());
        tracing::info!("Stored family '{}' ({} pseudos)", family.label(), family.count());
        Ok(())
    }

    fn update_family(&mut self, family: &SsspFamily) -> Result<()> {
        let current = self
            .families
            .get(family.label())
            .ok_or_else(|| SsspError::FamilyNotFound(family.label().to_string()))?;
        ensure_extension(current, family)?;

        let mut updated = family.clone();
        updated.mark_stored();
        self.families.insert(family.label().to_string(), updated);
        Ok(())
    }

    fn remove_family(&mut self, label: &str) -> Result<()> {
        if self.families.remove(label).is_none() {
            return Err(SsspError::FamilyNotFound(label.to_string()));
        }
        self.parameters.retain(|p| p.family_label() != label);
        tracing::info!("Removed family '{}'", label);
        Ok(())
    }

    fn load_family(&self, label: &str) -> Result<Option<SsspFamily>> {
        Ok(self.families.get(label).cloned())
    }

    fn families(&self) -> Result<Vec<SsspFamily>> {
        Ok(self.families.values().cloned().collect())
    }

    fn insert_parameters(&mut self, parameters: &mut SsspParameters) -> Result<()> {
        ensure_family_exists(&*self, parameters)?;
        parameters.mark_stored();
        self.parameters.push(parameters.clone());
        tracing::info!("Stored parameters for family '{}'", parameters.family_label());
        Ok(())
    }

    fn load_parameters(&self, family_label: &str) -> Result<Vec<SsspParameters>> {
        Ok(self
            .parameters
            .iter()
            .filter(|p| p.family_label() == family_label)
            .cloned()
            .collect())
    }
}
