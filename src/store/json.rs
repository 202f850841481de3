//! # JSON 目录仓库
//!
//! 每个实体一个 JSON 文档的落盘 [`Repository`] 实现。
//!
//! ## 目录结构
//! ```text
//! <root>/
//!   families/<label>.json               赝势族（含全部记录）
//!   parameters/<label>/0001.json        推荐参数（扁平映射）
//! ```
//! 标签中 `[A-Za-z0-9._-]` 以外的字符按 `%XX` 编码为文件名。
//!
//! 写入先落到临时文件：新建族与新参数通过 `hard_link` 原子地占用目标路径
//! （已存在即失败），更新通过 `rename` 覆盖。
//!
//! ## 依赖关系
//! - 实现 `store/mod.rs` 的 `Repository`
//! - 使用 `serde_json`

use super::{ensure_extension, ensure_family_exists, Repository};
use crate::error::{Result, SsspError};
use crate::models::{SsspFamily, SsspParameters};

use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

const FAMILIES_DIR: &str = "families";
const PARAMETERS_DIR: &str = "parameters";

/// JSON 目录仓库
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// 打开（必要时创建）仓库目录
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for sub in [FAMILIES_DIR, PARAMETERS_DIR] {
            let dir = root.join(sub);
            fs::create_dir_all(&dir).map_err(|e| SsspError::write(&dir, e))?;
        }
        tracing::debug!("Opened store at {}", root.display());
        Ok(JsonStore { root })
    }

    fn family_path(&self, label: &str) -> PathBuf {
        self.root
            .join(FAMILIES_DIR)
            .join(format!("{}.json", encode_label(label)))
    }

    fn parameters_dir(&self, label: &str) -> PathBuf {
        self.root.join(PARAMETERS_DIR).join(encode_label(label))
    }

    /// 写入同目录下的临时文件
    fn write_temp(&self, target: &Path, content: &str) -> Result<PathBuf> {
        let tmp = target.with_extension(format!("tmp.{}", std::process::id()));
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp)
            .map_err(|e| SsspError::write(&tmp, e))?;
        if let Err(e) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&tmp);
            return Err(SsspError::write(&tmp, e));
        }
        Ok(tmp)
    }

    fn read_family(&self, path: &Path) -> Result<SsspFamily> {
        let content = fs::read_to_string(path).map_err(|e| SsspError::read(path, e))?;
        let mut family: SsspFamily =
            serde_json::from_str(&content).map_err(|e| SsspError::Json {
                path: path.display().to_string(),
                source: e,
            })?;
        let mut seen = BTreeSet::new();
        for record in family.pseudos() {
            if !seen.insert(record.element.as_str()) {
                return Err(SsspError::DuplicateStoredElement {
                    label: family.label().to_string(),
                    element: record.element.clone(),
                });
            }
            if !record.verify() {
                return Err(SsspError::ChecksumMismatch {
                    label: family.label().to_string(),
                    element: record.element.clone(),
                });
            }
        }
        family.mark_stored();
        Ok(family)
    }
}

impl Repository for JsonStore {
    fn insert_family(&mut self, family: &mut SsspFamily) -> Result<()> {
        let target = self.family_path(family.label());
        let content = to_json(&*family, &target)?;
        let tmp = self.write_temp(&target, &content)?;

        let linked = fs::hard_link(&tmp, &target);
        // 临时文件在成功与失败时都需要清理
        let _ = fs::remove_file(&tmp);

        match linked {
            Ok(()) => {}
            Err(e) if e.kind() == IoErrorKind::AlreadyExists => {
                return Err(SsspError::DuplicateLabel(family.label().to_string()));
            }
            Err(e) => return Err(SsspError::write(&target, e)),
        }

        family.mark_stored();
        tracing::info!(
            "Stored family '{}' ({} pseudos) at {}",
            family.label(),
            family.count(),
            target.display()
        );
        Ok(())
    }

    fn update_family(&mut self, family: &SsspFamily) -> Result<()> {
        let target = self.family_path(family.label());
        if !target.exists() {
            return Err(SsspError::FamilyNotFound(family.label().to_string()));
        }
        let current = self.read_family(&target)?;
        ensure_extension(&current, family)?;

        let content = to_json(family, &target)?;
        let tmp = self.write_temp(&target, &content)?;
        fs::rename(&tmp, &target).map_err(|e| SsspError::write(&target, e))?;
        Ok(())
    }

    fn remove_family(&mut self, label: &str) -> Result<()> {
        let target = self.family_path(label);
        match fs::remove_file(&target) {
            Ok(()) => {}
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                return Err(SsspError::FamilyNotFound(label.to_string()));
            }
            Err(e) => return Err(SsspError::write(&target, e)),
        }

        let dir = self.parameters_dir(label);
        if dir.is_dir() {
            fs::remove_dir_all(&dir).map_err(|e| SsspError::write(&dir, e))?;
        }
        tracing::info!("Removed family '{}'", label);
        Ok(())
    }

    fn load_family(&self, label: &str) -> Result<Option<SsspFamily>> {
        let path = self.family_path(label);
        if !path.exists() {
            return Ok(None);
        }
        self.read_family(&path).map(Some)
    }

    fn families(&self) -> Result<Vec<SsspFamily>> {
        let dir = self.root.join(FAMILIES_DIR);
        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| SsspError::read(&dir, e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut families = paths
            .iter()
            .map(|p| self.read_family(p))
            .collect::<Result<Vec<_>>>()?;
        families.sort_by(|a, b| a.label().cmp(b.label()));
        Ok(families)
    }

    fn insert_parameters(&mut self, parameters: &mut SsspParameters) -> Result<()> {
        ensure_family_exists(&*self, parameters)?;

        let dir = self.parameters_dir(parameters.family_label());
        fs::create_dir_all(&dir).map_err(|e| SsspError::write(&dir, e))?;
        let content = to_json(&parameters.to_attributes(), &dir)?;

        let mut index = count_json_files(&dir)? + 1;
        let tmp = self.write_temp(&dir.join(format!("{:04}.json", index)), &content)?;

        // 完整写入临时文件后再占用第一个空闲序号
        let linked = loop {
            let candidate = dir.join(format!("{:04}.json", index));
            match fs::hard_link(&tmp, &candidate) {
                Ok(()) => break Ok(candidate),
                Err(e) if e.kind() == IoErrorKind::AlreadyExists => index += 1,
                Err(e) => break Err(SsspError::write(&candidate, e)),
            }
        };
        let _ = fs::remove_file(&tmp);
        let path = linked?;

        parameters.mark_stored();
        tracing::info!(
            "Stored parameters for family '{}' at {}",
            parameters.family_label(),
            path.display()
        );
        Ok(())
    }

    fn load_parameters(&self, family_label: &str) -> Result<Vec<SsspParameters>> {
        let dir = self.parameters_dir(family_label);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| SsspError::read(&dir, e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        paths
            .iter()
            .map(|path| {
                let content = fs::read_to_string(path).map_err(|e| SsspError::read(path, e))?;
                let value: Value =
                    serde_json::from_str(&content).map_err(|e| SsspError::Json {
                        path: path.display().to_string(),
                        source: e,
                    })?;
                let mut parameters = SsspParameters::from_attributes(&value)?;
                parameters.mark_stored();
                Ok(parameters)
            })
            .collect()
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, path: &Path) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| SsspError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

fn count_json_files(dir: &Path) -> Result<usize> {
    Ok(fs::read_dir(dir)
        .map_err(|e| SsspError::read(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
        .count())
}

/// 把标签编码为安全的文件名
fn encode_label(label: &str) -> String {
    let mut encoded = String::with_capacity(label.len());
    for byte in label.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::{exercise_repository, record};

    #[test]
    fn test_encode_label() {
        assert_eq!(encode_label("SSSP/1.1/PBE/efficiency"), "SSSP%2F1.1%2FPBE%2Fefficiency");
        assert_eq!(encode_label("SSSP"), "SSSP");
        assert_eq!(encode_label("a b"), "a%20b");
    }

    #[test]
    fn test_json_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        exercise_repository(&mut store);
    }

    #[test]
    fn test_json_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = JsonStore::open(dir.path()).unwrap();
            let mut family = SsspFamily::new("SSSP", None);
            family.add_pseudos(vec![record("He"), record("Ne")]).unwrap();
            store.insert_family(&mut family).unwrap();
        }

        let mut store = JsonStore::open(dir.path()).unwrap();
        let family = store.load_family("SSSP").unwrap().unwrap();
        assert!(family.is_stored());
        assert_eq!(family.get_pseudo("Ne").unwrap().filename, "Ne.upf");
        assert!(family.pseudos().all(|p| p.verify()));

        let mut again = SsspFamily::new("SSSP", None);
        assert!(matches!(
            store.insert_family(&mut again),
            Err(SsspError::DuplicateLabel(_))
        ));

        // 不留下临时文件
        let leftovers = fs::read_dir(dir.path().join(FAMILIES_DIR))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) != Some("json"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_corrupted_family_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        let mut family = SsspFamily::new("SSSP", None);
        family.add_pseudos(vec![record("He")]).unwrap();
        store.insert_family(&mut family).unwrap();

        let path = store.family_path("SSSP");
        let content = fs::read_to_string(&path).unwrap();
        let mut value: Value = serde_json::from_str(&content).unwrap();
        value["pseudos"][0]["content"] = Value::String("tampered".into());
        fs::write(&path, value.to_string()).unwrap();

        let err = store.load_family("SSSP").unwrap_err();
        assert!(matches!(err, SsspError::ChecksumMismatch { ref element, .. } if element == "He"));
    }

    #[test]
    fn test_duplicate_stored_element_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        let mut family = SsspFamily::new("SSSP", None);
        family.add_pseudos(vec![record("He"), record("Ne")]).unwrap();
        store.insert_family(&mut family).unwrap();

        let path = store.family_path("SSSP");
        let mut value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let he = value["pseudos"][0].clone();
        value["pseudos"].as_array_mut().unwrap().push(he);
        fs::write(&path, value.to_string()).unwrap();

        let err = store.load_family("SSSP").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Consistency);
        assert!(matches!(err, SsspError::DuplicateStoredElement { ref element, .. } if element == "He"));
    }

    #[test]
    fn test_parameters_are_numbered_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        let mut family = SsspFamily::new("SSSP", None);
        family.add_pseudos(vec![record("He")]).unwrap();
        store.insert_family(&mut family).unwrap();

        let value = serde_json::json!({
            "He": {"cutoff_wfc": 20.0, "cutoff_rho": 80.0, "filename": "He.upf", "md5": "b"},
        });
        for _ in 0..2 {
            let mut params = SsspParameters::new(&family, &value).unwrap();
            store.insert_parameters(&mut params).unwrap();
        }

        let mut names: Vec<String> = fs::read_dir(store.parameters_dir("SSSP"))
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["0001.json", "0002.json"]);
        assert_eq!(store.load_parameters("SSSP").unwrap().len(), 2);
    }

    #[test]
    fn test_remove_family_deletes_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path()).unwrap();
        let mut family = SsspFamily::new("SSSP", None);
        family.add_pseudos(vec![record("He")]).unwrap();
        store.insert_family(&mut family).unwrap();
        let value = serde_json::json!({
            "He": {"cutoff_wfc": 20.0, "cutoff_rho": 80.0, "filename": "He.upf", "md5": "b"},
        });
        let mut params = SsspParameters::new(&family, &value).unwrap();
        store.insert_parameters(&mut params).unwrap();

        store.remove_family("SSSP").unwrap();
        assert!(!store.family_path("SSSP").exists());
        assert!(!store.parameters_dir("SSSP").exists());
    }
}
