//! # 运行配置
//!
//! 解析仓库目录与镜像目录。优先级：命令行参数 > 环境变量 > 默认值。
//! 命令行与环境变量由 `clap` 的 `env` 特性处理，此处只负责默认值。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `directories` 定位用户数据目录

use crate::cli::GlobalArgs;
use crate::error::{Result, SsspError};
use crate::store::JsonStore;

use directories::ProjectDirs;
use std::path::PathBuf;

/// 仓库目录环境变量
pub const STORE_ENV: &str = "SSSP_STORE";
/// 镜像目录环境变量
pub const MIRROR_ENV: &str = "SSSP_MIRROR";

/// 运行配置
#[derive(Debug, Clone)]
pub struct Settings {
    /// JSON 仓库目录
    pub store_dir: PathBuf,
    /// 本地镜像目录
    pub mirror: Option<PathBuf>,
}

impl Settings {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let store_dir = match &args.store {
            Some(dir) => dir.clone(),
            None => default_store_dir()?,
        };
        Ok(Settings {
            store_dir,
            mirror: args.mirror.clone(),
        })
    }

    pub fn open_store(&self) -> Result<JsonStore> {
        JsonStore::open(&self.store_dir)
    }

    /// 镜像目录，未配置时报错
    pub fn require_mirror(&self) -> Result<&PathBuf> {
        self.mirror.as_ref().ok_or_else(|| {
            SsspError::InvalidArgument(format!(
                "no mirror configured; pass --mirror or set {}",
                MIRROR_ENV
            ))
        })
    }
}

/// 默认仓库目录：<用户数据目录>/ssspkit/store
fn default_store_dir() -> Result<PathBuf> {
    ProjectDirs::from("org", "materialscloud", "ssspkit")
        .map(|dirs| dirs.data_dir().join("store"))
        .ok_or_else(|| {
            SsspError::InvalidArgument(format!(
                "cannot determine a data directory; pass --store or set {}",
                STORE_ENV
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(store: Option<&str>, mirror: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            store: store.map(PathBuf::from),
            mirror: mirror.map(PathBuf::from),
            verbose: 0,
            quiet: false,
            log_file: None,
        }
    }

    #[test]
    fn test_explicit_paths() {
        let settings = Settings::from_args(&args(Some("/tmp/store"), Some("/tmp/mirror"))).unwrap();
        assert_eq!(settings.store_dir, PathBuf::from("/tmp/store"));
        assert_eq!(settings.require_mirror().unwrap(), &PathBuf::from("/tmp/mirror"));
    }

    #[test]
    fn test_missing_mirror() {
        let settings = Settings::from_args(&args(Some("/tmp/store"), None)).unwrap();
        let err = settings.require_mirror().unwrap_err();
        assert!(err.to_string().contains(MIRROR_ENV));
    }
}
