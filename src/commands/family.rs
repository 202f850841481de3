//! # family 命令实现
//!
//! ## 功能
//! - 从目录创建赝势族
//! - 列出已安装的族（可按 version/functional/library 过滤）
//! - 查看族的全部赝势，可导出 CSV
//! - 向已有族添加 UPF 文件
//! - 查看/导出单个元素的赝势
//!
//! ## 依赖关系
//! - 使用 `cli/family.rs` 定义的参数
//! - 使用 `importer.rs`, `parsers/`, `store/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::family::{
    AddArgs, CreateArgs, FamilyArgs, FamilyCommands, ListArgs, PseudoArgs, ShowArgs,
};
use crate::config::Settings;
use crate::error::{Result, SsspError};
use crate::importer;
use crate::models::SsspFamily;
use crate::parsers;
use crate::selector::FamilyChoice;
use crate::store::{self, Repository};
use crate::utils::{output, progress};

use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// 族列表行
#[derive(Debug, Clone, Tabled)]
struct FamilyRow {
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Pseudos")]
    count: usize,
    #[tabled(rename = "Description")]
    description: String,
}

/// 赝势行
#[derive(Debug, Clone, Tabled)]
struct PseudoRow {
    #[tabled(rename = "Element")]
    element: String,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "SHA-256")]
    checksum: String,
}

/// 执行 family 命令
pub fn execute(args: FamilyArgs, settings: &Settings) -> Result<()> {
    let mut repo = settings.open_store()?;
    match args.command {
        FamilyCommands::Create(args) => create(args, &mut repo),
        FamilyCommands::List(args) => list(args, &repo),
        FamilyCommands::Show(args) => show(args, &repo),
        FamilyCommands::Add(args) => add(args, &mut repo),
        FamilyCommands::Pseudo(args) => pseudo(args, &repo),
    }
}

fn create(args: CreateArgs, repo: &mut dyn Repository) -> Result<()> {
    output::print_header("Creating Pseudopotential Family");

    let spinner = progress::create_spinner(&format!("Importing '{}'", args.dir.display()));
    let result = importer::create_from_folder(
        repo,
        &args.dir,
        &args.label,
        args.description.as_deref(),
    );
    spinner.finish_and_clear();

    let family = result?;
    output::print_done(&format!(
        "Created family '{}' with {} pseudos: {}",
        family.label(),
        family.count(),
        join_elements(&family)
    ));
    Ok(())
}

fn list(args: ListArgs, repo: &dyn Repository) -> Result<()> {
    let families: Vec<SsspFamily> = repo
        .families()?
        .into_iter()
        .filter(|f| matches_filter(f.label(), &args))
        .collect();

    if families.is_empty() {
        output::print_warning("No families found.");
        return Ok(());
    }

    let rows: Vec<FamilyRow> = families
        .iter()
        .map(|f| FamilyRow {
            label: f.label().to_string(),
            count: f.count(),
            description: f.description().unwrap_or("").to_string(),
        })
        .collect();

    output::print_header(&format!("{} Installed Families", rows.len()));
    println!("{}", Table::new(rows));
    Ok(())
}

/// 过滤条件；设置了任一条件时，只匹配符合 SSSP 命名的标签
fn matches_filter(label: &str, args: &ListArgs) -> bool {
    if args.version.is_none() && args.functional.is_none() && args.library.is_none() {
        return true;
    }
    let Some(choice) = FamilyChoice::from_label(label) else {
        return false;
    };
    let same = |wanted: &Option<String>, actual: &str| {
        wanted
            .as_deref()
            .map_or(true, |w| w.eq_ignore_ascii_case(actual))
    };
    same(&args.version, &choice.version)
        && same(&args.functional, &choice.functional)
        && same(&args.library, &choice.library)
}

fn show(args: ShowArgs, repo: &dyn Repository) -> Result<()> {
    let family = load(repo, &args.label)?;

    output::print_header(&format!("Family '{}'", family.label()));
    if let Some(description) = family.description() {
        output::print_field("Description", description);
    }
    output::print_field("Pseudos", &family.count().to_string());
    println!();

    let rows: Vec<PseudoRow> = family
        .pseudos()
        .map(|p| PseudoRow {
            element: p.element.clone(),
            filename: p.filename.clone(),
            checksum: p.checksum.clone(),
        })
        .collect();
    println!("{}", Table::new(rows.clone()));

    if let Some(csv_path) = &args.csv {
        write_pseudo_csv(&rows, csv_path)?;
        output::print_success(&format!("Saved table to '{}'", csv_path.display()));
    }
    Ok(())
}

fn add(args: AddArgs, repo: &mut dyn Repository) -> Result<()> {
    let records = args
        .files
        .iter()
        .map(|path| parsers::parse_pseudo_file(path))
        .collect::<Result<Vec<_>>>()?;

    let family = store::add_to_family(repo, &args.label, records)?;
    output::print_done(&format!(
        "Family '{}' now has {} pseudos: {}",
        family.label(),
        family.count(),
        join_elements(&family)
    ));
    Ok(())
}

fn pseudo(args: PseudoArgs, repo: &dyn Repository) -> Result<()> {
    let family = load(repo, &args.label)?;
    let record = family.get_pseudo(&args.element)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &record.content).map_err(|e| SsspError::write(path, e))?;
            output::print_success(&format!(
                "Wrote pseudo for {} to '{}'",
                record.element,
                path.display()
            ));
        }
        None => {
            output::print_field("Family", family.label());
            output::print_field("Element", &record.element);
            output::print_field("File", &record.filename);
            output::print_field("SHA-256", &record.checksum);
            output::print_field("Size", &format!("{} bytes", record.content.len()));
        }
    }
    Ok(())
}

fn load(repo: &dyn Repository, label: &str) -> Result<SsspFamily> {
    repo.load_family(label)?
        .ok_or_else(|| SsspError::FamilyNotFound(label.to_string()))
}

fn join_elements(family: &SsspFamily) -> String {
    family.elements().into_iter().collect::<Vec<_>>().join(", ")
}

fn write_pseudo_csv(rows: &[PseudoRow], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["element", "filename", "sha256"])?;
    for row in rows {
        wtr.write_record([&row.element, &row.filename, &row.checksum])?;
    }
    wtr.flush().map_err(|e| SsspError::write(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(version: Option<&str>, functional: Option<&str>, library: Option<&str>) -> ListArgs {
        ListArgs {
            version: version.map(str::to_string),
            functional: functional.map(str::to_string),
            library: library.map(str::to_string),
        }
    }

    #[test]
    fn test_matches_filter() {
        let label = "SSSP/1.1/PBE/efficiency";
        assert!(matches_filter(label, &filter(None, None, None)));
        assert!(matches_filter("custom", &filter(None, None, None)));
        assert!(matches_filter(label, &filter(Some("1.1"), None, None)));
        assert!(matches_filter(label, &filter(None, Some("pbe"), Some("efficiency"))));
        assert!(!matches_filter(label, &filter(None, None, Some("precision"))));
        assert!(!matches_filter("custom", &filter(Some("1.1"), None, None)));
    }

    #[test]
    fn test_write_pseudo_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pseudos.csv");
        let rows = vec![PseudoRow {
            element: "He".to_string(),
            filename: "He.upf".to_string(),
            checksum: "abc".to_string(),
        }];
        write_pseudo_csv(&rows, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "element,filename,sha256\nHe,He.upf,abc\n");
    }
}
