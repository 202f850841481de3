//! # 目录导入器
//!
//! 扫描目录中的 UPF 文件，解析元素并创建新的赝势族。
//!
//! ## 流程
//! 1. 校验目录存在
//! 2. 收集 `*.upf` / `*.UPF` 文件（不递归，跟随符号链接，按文件名排序）
//! 3. 逐个解析，检查元素重复
//! 4. 标签未被占用时一次性写入仓库
//!
//! 任一步失败时仓库中不会留下任何数据。
//!
//! ## 依赖关系
//! - 使用 `parsers/`, `models/`, `store/`
//! - 被 `commands/family.rs`, `selector/installer.rs` 使用（后者只用 `build_family`）
//! - 使用 `walkdir` 遍历目录

use crate::error::{Result, SsspError};
use crate::models::{PseudoRecord, SsspFamily};
use crate::parsers;
use crate::store::Repository;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 收集目录下的赝势文件
pub fn collect_pseudo_files(dirpath: &Path) -> Result<Vec<PathBuf>> {
    if !dirpath.is_dir() {
        return Err(SsspError::NotADirectory(dirpath.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dirpath)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dirpath).to_path_buf();
            SsspError::read(&path, e.into())
        })?;
        // follow_links 下符号链接报告其目标的类型
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if parsers::is_pseudo_filename(name) => {
                files.push(entry.path().to_path_buf())
            }
            _ => tracing::debug!("Ignoring {}", entry.path().display()),
        }
    }

    files.sort();
    Ok(files)
}

/// 解析目录下的全部赝势文件，元素重复时失败
pub fn parse_folder(dirpath: &Path) -> Result<Vec<PseudoRecord>> {
    let files = collect_pseudo_files(dirpath)?;
    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut records = Vec::with_capacity(files.len());

    for path in files {
        let record = parsers::parse_pseudo_file(&path)?;
        tracing::debug!("Parsed {} -> {}", path.display(), record.element);

        if let Some(first) = seen.get(&record.element) {
            return Err(SsspError::DuplicateParsedElement {
                dir: dirpath.display().to_string(),
                element: record.element.clone(),
                first: file_name(first),
                second: file_name(&path),
            });
        }
        seen.insert(record.element.clone(), path);
        records.push(record);
    }

    Ok(records)
}

/// 从目录构建尚未持久化的赝势族，标签已被占用时失败
pub fn build_family<R: Repository + ?Sized>(
    repo: &R,
    dirpath: &Path,
    label: &str,
    description: Option<&str>,
) -> Result<SsspFamily> {
    let records = parse_folder(dirpath)?;

    if repo.contains_family(label)? {
        return Err(SsspError::DuplicateLabel(label.to_string()));
    }

    let mut family = SsspFamily::new(label, description);
    family.add_pseudos(records)?;
    Ok(family)
}

/// 从目录创建并持久化赝势族
pub fn create_from_folder<R: Repository + ?Sized>(
    repo: &mut R,
    dirpath: &Path,
    label: &str,
    description: Option<&str>,
) -> Result<SsspFamily> {
    let mut family = build_family(&*repo, dirpath, label, description)?;
    repo.insert_family(&mut family)?;

    tracing::info!(
        "Created family '{}' from {} ({} elements)",
        label,
        dirpath.display(),
        family.count()
    );
    Ok(family)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
