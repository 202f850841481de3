//! # select 命令实现
//!
//! ## 功能
//! - 未给出完整的 version/functional/library 时，列出目录及安装状态
//! - 给出完整选择时，检查是否已安装；`--install` 时从镜像安装缺失的族
//!
//! ## 依赖关系
//! - 使用 `cli/select.rs` 定义的参数
//! - 使用 `selector/`, `config.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::select::SelectArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::selector::{FamilyChoice, MirrorInstaller, Selector, SelectorState};
use crate::store::JsonStore;
use crate::utils::{output, progress};

/// 执行 select 命令
pub fn execute(args: SelectArgs, settings: &Settings) -> Result<()> {
    let mirror = if args.install {
        settings.require_mirror()?.clone()
    } else {
        settings.mirror.clone().unwrap_or_default()
    };
    let mut selector = Selector::new(settings.open_store()?, MirrorInstaller::new(mirror));

    let (Some(version), Some(functional), Some(library)) =
        (&args.version, &args.functional, &args.library)
    else {
        return list_options(&selector);
    };

    let choice = FamilyChoice::new(version, functional, library)?;
    selector.select(choice)?;

    let pending = match selector.state() {
        SelectorState::NeedsInstall(choice) => Some(choice.clone()),
        _ => None,
    };
    if let Some(choice) = pending {
        if !args.install {
            output::print_warning(&format!(
                "{} is not installed; rerun with --install to install it from the mirror.",
                choice
            ));
            return Ok(());
        }

        let spinner = progress::create_spinner(&format!("Installing {}", choice));
        let result = selector.install().map(|_| ());
        spinner.finish_and_clear();
        result?;
    }

    if let Some(family) = selector.family() {
        output::print_done(&format!("Selected family '{}'", family.label()));
        if let Some(description) = family.description() {
            output::print_field("Description", description);
        }
        output::print_field("Pseudos", &family.count().to_string());
    }
    Ok(())
}

fn list_options(selector: &Selector<JsonStore, MirrorInstaller>) -> Result<()> {
    output::print_header("SSSP Families");
    for option in selector.options()? {
        output::print_marked(option.installed, &option.choice.to_string());
    }
    output::print_info("Pass --sssp-version, --functional and --library to select one.");
    Ok(())
}
