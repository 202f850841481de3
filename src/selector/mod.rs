//! # 交互式族选择器
//!
//! 以显式状态机实现：列出已安装的族、为缺失的族提供安装动作、绑定选中的族。
//!
//! ## 状态转换
//! ```text
//! Unselected --select--> Checking --1 个匹配--> Installed
//!                                 --0 个匹配--> NeedsInstall --install--> Installing --检查--> Installed
//!                                 --多个匹配--> 错误（仓库不一致）
//! ```
//! 检查阶段出错（包括仓库读取失败）时回到 `Unselected`，不会停留在中间状态。
//!
//! ## 依赖关系
//! - 使用 `store/`, `models/`
//! - 被 `commands/select.rs` 使用
//! - 子模块: catalog, installer

pub mod catalog;
pub mod installer;

pub use catalog::FamilyChoice;
pub use installer::{Installer, MirrorInstaller};

use crate::error::{Result, SsspError};
use crate::models::SsspFamily;
use crate::store::Repository;

/// 选择器状态
#[derive(Debug, Clone)]
pub enum SelectorState {
    /// 尚未选择
    Unselected,
    /// 正在查询已安装的族
    Checking(FamilyChoice),
    /// 已安装并绑定
    Installed(SsspFamily),
    /// 未安装，可执行安装
    NeedsInstall(FamilyChoice),
    /// 正在安装
    Installing(FamilyChoice),
}

impl SelectorState {
    fn name(&self) -> &'static str {
        match self {
            SelectorState::Unselected => "unselected",
            SelectorState::Checking(_) => "checking",
            SelectorState::Installed(_) => "installed",
            SelectorState::NeedsInstall(_) => "needs-install",
            SelectorState::Installing(_) => "installing",
        }
    }
}

impl std::fmt::Display for SelectorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 目录中的一项及其安装状态
#[derive(Debug, Clone)]
pub struct SelectorOption {
    pub choice: FamilyChoice,
    pub installed: bool,
}

/// 族选择器
pub struct Selector<R: Repository, I: Installer> {
    repo: R,
    installer: I,
    state: SelectorState,
}

impl<R: Repository, I: Installer> Selector<R, I> {
    pub fn new(repo: R, installer: I) -> Self {
        Selector {
            repo,
            installer,
            state: SelectorState::Unselected,
        }
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    /// 已绑定的族
    pub fn family(&self) -> Option<&SsspFamily> {
        match &self.state {
            SelectorState::Installed(family) => Some(family),
            _ => None,
        }
    }

    /// 目录中的全部选择及其是否已安装
    pub fn options(&self) -> Result<Vec<SelectorOption>> {
        let installed: Vec<FamilyChoice> = self
            .repo
            .families()?
            .iter()
            .filter_map(|f| FamilyChoice::from_label(f.label()))
            .collect();

        Ok(FamilyChoice::catalog()
            .into_iter()
            .map(|choice| SelectorOption {
                installed: installed.contains(&choice),
                choice,
            })
            .collect())
    }

    /// 选择一个族并检查是否已安装
    pub fn select(&mut self, choice: FamilyChoice) -> Result<&SelectorState> {
        tracing::debug!("Selected {}", choice);
        self.state = SelectorState::Checking(choice.clone());
        self.check(choice)
    }

    /// 安装当前选择的族，完成后重新检查
    pub fn install(&mut self) -> Result<&SelectorState> {
        let choice = match &self.state {
            SelectorState::NeedsInstall(choice) => choice.clone(),
            other => {
                return Err(SsspError::InvalidTransition {
                    action: "install".to_string(),
                    state: other.to_string(),
                })
            }
        };

        self.state = SelectorState::Installing(choice.clone());
        if let Err(e) = self.installer.install(&mut self.repo, &choice) {
            tracing::warn!("Installation of {} failed: {}", choice, e);
            self.state = SelectorState::NeedsInstall(choice);
            return Err(e);
        }

        self.check(choice)
    }

    /// 回到未选择状态
    pub fn clear(&mut self) {
        self.state = SelectorState::Unselected;
    }

    /// 查询仓库并进入下一状态；任何失败都回到 `Unselected`
    fn check(&mut self, choice: FamilyChoice) -> Result<&SelectorState> {
        let families = match self.repo.families() {
            Ok(families) => families,
            Err(e) => {
                tracing::warn!("Checking {} failed: {}", choice, e);
                self.state = SelectorState::Unselected;
                return Err(e);
            }
        };
        let mut installed: Vec<SsspFamily> = families
            .into_iter()
            .filter(|f| FamilyChoice::from_label(f.label()).as_ref() == Some(&choice))
            .collect();

        self.state = match installed.len() {
            0 => SelectorState::NeedsInstall(choice),
            1 => SelectorState::Installed(installed.remove(0)),
            _ => {
                self.state = SelectorState::Unselected;
                return Err(SsspError::MultipleFamilies {
                    choice: choice.to_string(),
                    labels: installed.iter().map(|f| f.label().to_string()).collect(),
                });
            }
        };

        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::importer;
    use crate::importer::tests::write_pseudos;
    use crate::store::{JsonStore, MemoryStore};

    /// 记录调用次数的安装器
    struct FolderInstaller {
        dir: tempfile::TempDir,
        calls: usize,
        fail: bool,
    }

    impl FolderInstaller {
        fn new(fail: bool) -> Self {
            let dir = tempfile::tempdir().unwrap();
            write_pseudos(dir.path());
            FolderInstaller {
                dir,
                calls: 0,
                fail,
            }
        }
    }

    impl Installer for FolderInstaller {
        fn install(
            &mut self,
            repo: &mut dyn Repository,
            choice: &FamilyChoice,
        ) -> Result<SsspFamily> {
            self.calls += 1;
            if self.fail {
                return Err(SsspError::InvalidArgument("mirror unavailable".to_string()));
            }
            importer::create_from_folder(
                repo,
                self.dir.path(),
                &choice.label(),
                Some(choice.description().as_str()),
            )
        }
    }

    fn choice() -> FamilyChoice {
        FamilyChoice::new("1.1", "PBE", "efficiency").unwrap()
    }

    #[test]
    fn test_select_and_install() {
        let mut selector = Selector::new(MemoryStore::new(), FolderInstaller::new(false));
        assert!(matches!(selector.state(), SelectorState::Unselected));

        let state = selector.select(choice()).unwrap();
        assert!(matches!(state, SelectorState::NeedsInstall(_)));
        assert!(selector.family().is_none());

        let state = selector.install().unwrap();
        assert!(matches!(state, SelectorState::Installed(_)));
        assert_eq!(selector.family().unwrap().label(), "SSSP/1.1/PBE/efficiency");
        assert_eq!(selector.installer.calls, 1);

        // 再次选择直接绑定，不再安装
        selector.clear();
        let state = selector.select(choice()).unwrap();
        assert!(matches!(state, SelectorState::Installed(_)));
        assert_eq!(selector.installer.calls, 1);

        let options = selector.options().unwrap();
        assert_eq!(options.iter().filter(|o| o.installed).count(), 1);
    }

    #[test]
    fn test_install_requires_needs_install() {
        let mut selector = Selector::new(MemoryStore::new(), FolderInstaller::new(false));
        let err = selector.install().unwrap_err();
        assert!(err.to_string().contains("unselected"));
        assert_eq!(selector.installer.calls, 0);
    }

    #[test]
    fn test_install_failure_returns_to_needs_install() {
        let mut selector = Selector::new(MemoryStore::new(), FolderInstaller::new(true));
        selector.select(choice()).unwrap();
        assert!(selector.install().is_err());
        assert!(matches!(selector.state(), SelectorState::NeedsInstall(_)));
    }

    /// 安装后把一个损坏的文档写入仓库的安装器
    struct CorruptingInstaller {
        pseudos: tempfile::TempDir,
        store_root: std::path::PathBuf,
    }

    impl Installer for CorruptingInstaller {
        fn install(
            &mut self,
            repo: &mut dyn Repository,
            choice: &FamilyChoice,
        ) -> Result<SsspFamily> {
            let family =
                importer::create_from_folder(repo, self.pseudos.path(), &choice.label(), None)?;
            std::fs::write(self.store_root.join("families").join("broken.json"), "{").unwrap();
            Ok(family)
        }
    }

    #[test]
    fn test_repository_error_during_check_resets_state() {
        let store_dir = tempfile::tempdir().unwrap();
        let pseudos = tempfile::tempdir().unwrap();
        write_pseudos(pseudos.path());
        let installer = CorruptingInstaller {
            pseudos,
            store_root: store_dir.path().to_path_buf(),
        };
        let mut selector = Selector::new(JsonStore::open(store_dir.path()).unwrap(), installer);

        selector.select(choice()).unwrap();
        let err = selector.install().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(matches!(selector.state(), SelectorState::Unselected));

        // 选择同样回到 Unselected，之后的安装报告状态错误而不是卡在中间状态
        assert!(selector.select(choice()).is_err());
        assert!(matches!(selector.state(), SelectorState::Unselected));
        let err = selector.install().unwrap_err();
        assert!(err.to_string().contains("unselected"));
    }

    #[test]
    fn test_multiple_matches_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_pseudos(dir.path());
        let mut store = MemoryStore::new();
        importer::create_from_folder(&mut store, dir.path(), "SSSP/1.1/PBE/efficiency", None)
            .unwrap();
        importer::create_from_folder(&mut store, dir.path(), "SSSP/1.1/pbe/Efficiency", None)
            .unwrap();

        let mut selector = Selector::new(store, FolderInstaller::new(false));
        let err = selector.select(choice()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Consistency);
        assert!(matches!(selector.state(), SelectorState::Unselected));
    }
}
