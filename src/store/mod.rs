//! # 持久化仓库模块
//!
//! 以显式的仓库接口保存赝势族与推荐参数，提供按标签的唯一性保证。
//!
//! ## 语义
//! - `insert_family`: 原子的 insert-if-absent，标签重复时失败
//! - `update_family`: 只允许扩展已持久化族的记录集合
//! - `remove_family`: 用于回滚未完成的安装
//! - 读取返回的实体均标记为已持久化
//!
//! ## 依赖关系
//! - 被 `importer.rs`, `selector/`, `commands/` 使用
//! - 使用 `models/`
//! - 子模块: memory, json

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::error::{Result, SsspError};
use crate::models::{PseudoRecord, SsspFamily, SsspParameters};

/// 赝势族与参数的存储接口
pub trait Repository {
    /// 持久化新的赝势族；标签已存在时返回 `DuplicateLabel`
    fn insert_family(&mut self, family: &mut SsspFamily) -> Result<()>;

    /// 以扩展后的记录集合替换已持久化的族
    fn update_family(&mut self, family: &SsspFamily) -> Result<()>;

    /// 删除族及其全部推荐参数；族不存在时返回 `FamilyNotFound`
    fn remove_family(&mut self, label: &str) -> Result<()>;

    /// 按标签读取赝势族
    fn load_family(&self, label: &str) -> Result<Option<SsspFamily>>;

    /// 全部赝势族（按标签排序）
    fn families(&self) -> Result<Vec<SsspFamily>>;

    /// 持久化推荐参数，目标族必须存在
    fn insert_parameters(&mut self, parameters: &mut SsspParameters) -> Result<()>;

    /// 读取某个族的全部推荐参数（按插入顺序）
    fn load_parameters(&self, family_label: &str) -> Result<Vec<SsspParameters>>;

    fn contains_family(&self, label: &str) -> Result<bool> {
        Ok(self.load_family(label)?.is_some())
    }
}

/// 向已持久化的族添加记录
///
/// 添加失败时仓库中的族保持不变。
pub fn add_to_family<R: Repository + ?Sized>(
    repo: &mut R,
    label: &str,
    records: Vec<PseudoRecord>,
) -> Result<SsspFamily> {
    let mut family = repo
        .load_family(label)?
        .ok_or_else(|| SsspError::FamilyNotFound(label.to_string()))?;

    let added = records.len();
    family.add_pseudos(records)?;
    repo.update_family(&family)?;

    tracing::info!("Added {} pseudo(s) to family '{}'", added, label);
    Ok(family)
}

/// 校验 `updated` 只是在 `current` 之上追加记录
pub(crate) fn ensure_extension(current: &SsspFamily, updated: &SsspFamily) -> Result<()> {
    for record in current.pseudos() {
        match updated.get_pseudo(&record.element) {
            Ok(candidate) if candidate.checksum == record.checksum => {}
            _ => {
                return Err(SsspError::ModificationNotAllowed(format!(
                    "{} (pseudo for element `{}` cannot be changed)",
                    current, record.element
                )))
            }
        }
    }
    Ok(())
}

/// 检查参数的目标族是否存在
pub(crate) fn ensure_family_exists<R: Repository + ?Sized>(
    repo: &R,
    parameters: &SsspParameters,
) -> Result<()> {
    if repo.contains_family(parameters.family_label())? {
        Ok(())
    } else {
        Err(SsspError::FamilyNotFound(
            parameters.family_label().to_string(),
        ))
    }
}
