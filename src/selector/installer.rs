//! # SSSP 族安装器
//!
//! 把目录中缺失的族安装到仓库。下载本身不在此处实现：
//! [`MirrorInstaller`] 从已同步到本地的镜像目录导入。
//!
//! ## 镜像目录结构
//! ```text
//! <mirror>/
//!   SSSP_1.1_PBE_efficiency/        UPF 文件
//!   SSSP_1.1_PBE_efficiency.json    推荐参数（可选）
//! ```
//!
//! 参数写入失败时删除已写入的族，安装要么完整成功，要么不留痕迹。
//!
//! ## 依赖关系
//! - 使用 `importer.rs`, `models/parameters.rs`, `store/`
//! - 被 `selector/mod.rs` 调用

use super::FamilyChoice;
use crate::error::Result;
use crate::importer;
use crate::models::{SsspFamily, SsspParameters};
use crate::store::Repository;

use std::path::PathBuf;

/// 安装动作
pub trait Installer {
    /// 安装 `choice` 对应的族并返回已持久化的族
    fn install(&mut self, repo: &mut dyn Repository, choice: &FamilyChoice)
        -> Result<SsspFamily>;
}

/// 从本地镜像目录安装
#[derive(Debug, Clone)]
pub struct MirrorInstaller {
    base: PathBuf,
}

impl MirrorInstaller {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        MirrorInstaller { base: base.into() }
    }

    pub fn archive_dir(&self, choice: &FamilyChoice) -> PathBuf {
        self.base.join(choice.archive_name())
    }

    pub fn metadata_file(&self, choice: &FamilyChoice) -> PathBuf {
        self.base.join(format!("{}.json", choice.archive_name()))
    }
}

impl Installer for MirrorInstaller {
    fn install(
        &mut self,
        repo: &mut dyn Repository,
        choice: &FamilyChoice,
    ) -> Result<SsspFamily> {
        let label = choice.label();
        let description = choice.description();
        let archive = self.archive_dir(choice);
        let metadata = self.metadata_file(choice);

        tracing::info!("Installing {} from {}", choice, archive.display());

        let mut family =
            importer::build_family(&*repo, &archive, &label, Some(description.as_str()))?;

        // 先对照元素集合校验参数，再写入任何数据
        let parameters = if metadata.is_file() {
            let mut candidate = family.clone();
            candidate.mark_stored();
            Some(SsspParameters::create_from_file(&metadata, &candidate)?)
        } else {
            tracing::warn!(
                "No recommended parameters at {}, installing pseudos only",
                metadata.display()
            );
            None
        };

        repo.insert_family(&mut family)?;
        if let Some(mut parameters) = parameters {
            if let Err(e) = repo.insert_parameters(&mut parameters) {
                // 回滚：不留下没有参数的族
                if let Err(rollback) = repo.remove_family(&label) {
                    tracing::error!("Failed to roll back family '{}': {}", label, rollback);
                }
                return Err(e);
            }
        }

        Ok(family)
    }
}
