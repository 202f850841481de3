//! # params 命令实现
//!
//! ## 功能
//! - 从 JSON 文件为已持久化的族导入推荐参数
//! - 以表格显示推荐参数，可导出 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/params.rs` 定义的参数
//! - 使用 `models/parameters.rs`, `store/`
//! - 使用 `utils/output.rs`

use crate::cli::params::{ImportArgs, ParamsArgs, ParamsCommands, ShowParamsArgs};
use crate::config::Settings;
use crate::error::{Result, SsspError};
use crate::models::SsspParameters;
use crate::store::Repository;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 参数表格行
#[derive(Debug, Clone, Tabled)]
struct CutoffRow {
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "ecutwfc (Ry)")]
    cutoff_wfc: String,
    #[tabled(rename = "ecutrho (Ry)")]
    cutoff_rho: String,
    #[tabled(rename = "Dual")]
    dual: String,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "md5")]
    md5: String,
}

/// 执行 params 命令
pub fn execute(args: ParamsArgs, settings: &Settings) -> Result<()> {
    let mut repo = settings.open_store()?;
    match args.command {
        ParamsCommands::Import(args) => import(args, &mut repo),
        ParamsCommands::Show(args) => show(args, &repo),
    }
}

fn import(args: ImportArgs, repo: &mut dyn Repository) -> Result<()> {
    let family = repo
        .load_family(&args.family)?
        .ok_or_else(|| SsspError::FamilyNotFound(args.family.clone()))?;

    let mut parameters = SsspParameters::create_from_file(&args.file, &family)?;
    repo.insert_parameters(&mut parameters)?;

    output::print_done(&format!(
        "Attached parameters for {} elements to family '{}'",
        parameters.elements().len(),
        family.label()
    ));
    Ok(())
}

fn show(args: ShowParamsArgs, repo: &dyn Repository) -> Result<()> {
    let all = repo.load_parameters(&args.family)?;
    let Some(parameters) = all.last() else {
        output::print_warning(&format!(
            "No parameters attached to family '{}'.",
            args.family
        ));
        return Ok(());
    };
    if all.len() > 1 {
        output::print_info(&format!(
            "Family '{}' has {} parameter sets; showing the latest.",
            args.family,
            all.len()
        ));
    }

    let rows = cutoff_rows(parameters, args.element.as_deref())?;

    output::print_header(&format!("Recommended Cutoffs for '{}'", args.family));
    println!("{}", Table::new(rows.clone()));

    if let Some(csv_path) = &args.csv {
        write_cutoff_csv(&rows, csv_path)?;
        output::print_success(&format!("Saved table to '{}'", csv_path.display()));
    }
    Ok(())
}

/// 生成表格行；指定元素时只包含该元素
fn cutoff_rows(parameters: &SsspParameters, element: Option<&str>) -> Result<Vec<CutoffRow>> {
    let elements: Vec<String> = match element {
        Some(element) => vec![element.to_string()],
        None => parameters.elements().into_iter().collect(),
    };

    elements
        .into_iter()
        .map(|element| {
            let metadata = parameters.get_metadata(&element)?;
            let cutoffs = parameters.get_cutoffs(&element)?;
            Ok(CutoffRow {
                element,
                cutoff_wfc: format!("{:.1}", cutoffs.wavefunction),
                cutoff_rho: format!("{:.1}", cutoffs.charge_density),
                dual: format!("{:.2}", cutoffs.dual),
                filename: metadata.filename.clone(),
                md5: metadata.md5.clone(),
            })
        })
        .collect()
}

fn write_cutoff_csv(rows: &[CutoffRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["element", "cutoff_wfc", "cutoff_rho", "dual", "filename", "md5"])?;
    for row in rows {
        wtr.write_record([
            &row.element,
            &row.cutoff_wfc,
            &row.cutoff_rho,
            &row.dual,
            &row.filename,
            &row.md5,
        ])?;
    }
    wtr.flush().map_err(|e| SsspError::write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{PseudoRecord, SsspFamily};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn parameters() -> SsspParameters {
        let mut store = MemoryStore::new();
        let mut family = SsspFamily::new("SSSP", None);
        family
            .add_pseudos(vec![
                PseudoRecord::new("He", "He.upf", "He"),
                PseudoRecord::new("Ne", "Ne.upf", "Ne"),
            ])
            .unwrap();
        store.insert_family(&mut family).unwrap();

        let value = json!({
            "He": {"cutoff_wfc": 20.0, "cutoff_rho": 80.0, "filename": "He.upf", "md5": "b"},
            "Ne": {"cutoff_wfc": 30.0, "cutoff_rho": 240.0, "filename": "Ne.upf", "md5": "c"},
        });
        SsspParameters::new(&family, &value).unwrap()
    }

    #[test]
    fn test_cutoff_rows() {
        let params = parameters();

        let rows = cutoff_rows(&params, None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].element, "He");
        assert_eq!(rows[0].dual, "4.00");
        assert_eq!(rows[1].cutoff_rho, "240.0");

        let rows = cutoff_rows(&params, Some("Ne")).unwrap();
        assert_eq!(rows.len(), 1);

        let err = cutoff_rows(&params, Some("Br")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Key);
    }

    #[test]
    fn test_write_cutoff_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cutoffs.csv");
        let rows = cutoff_rows(&parameters(), Some("He")).unwrap();
        write_cutoff_csv(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "element,cutoff_wfc,cutoff_rho,dual,filename,md5\nHe,20.0,80.0,4.00,He.upf,b\n"
        );
    }
}
