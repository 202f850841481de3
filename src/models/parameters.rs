//! # SSSP 推荐参数
//!
//! 为某个已持久化的 [`SsspFamily`] 的每个元素附加推荐的截断能等元数据。
//!
//! ## 每个元素的数据格式
//! ```text
//! {
//!   "Ar": {"cutoff_wfc": 10.0, "cutoff_rho": 20.0, "filename": "Ar.upf", "md5": "91d02ab07c1"},
//!   ...
//! }
//! ```
//!
//! 持久化时为扁平映射：保留键 `family_label` 指向所属族，其余键均为元素符号。
//!
//! ## 依赖关系
//! - 使用 `models/family.rs`
//! - 被 `store/`, `selector/installer.rs`, `commands/params.rs` 使用

use crate::error::{Result, SsspError};
use crate::models::SsspFamily;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// 持久化映射中指向族标签的保留键
pub const KEY_FAMILY_LABEL: &str = "family_label";

/// 数值字段
const NUMERIC_KEYS: [&str; 2] = ["cutoff_wfc", "cutoff_rho"];
/// 文本字段
const TEXT_KEYS: [&str; 2] = ["filename", "md5"];

/// 单个元素的推荐参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// 波函数截断能 (Ry)
    pub cutoff_wfc: f64,
    /// 电荷密度截断能 (Ry)
    pub cutoff_rho: f64,
    /// 对应的赝势文件名
    pub filename: String,
    /// 赝势文件的 md5
    pub md5: String,
}

/// 截断能
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cutoffs {
    pub wavefunction: f64,
    pub charge_density: f64,
    /// charge_density / wavefunction
    pub dual: f64,
}

/// SSSP 推荐参数
#[derive(Debug, Clone)]
pub struct SsspParameters {
    family_label: String,
    entries: BTreeMap<String, ElementMetadata>,
    stored: bool,
}

impl SsspParameters {
    /// 为已持久化的族构造参数
    ///
    /// `parameters` 的元素集合必须与族的元素集合完全一致，
    /// 每个元素必须提供全部字段且类型正确。
    pub fn new(family: &SsspFamily, parameters: &Value) -> Result<Self> {
        if !family.is_stored() {
            return Err(SsspError::NotStoredFamily);
        }

        let map = parameters.as_object().ok_or_else(|| SsspError::WrongType {
            expected: "object".to_string(),
            found: json_type_name(parameters).to_string(),
        })?;

        let elements_family = family.elements();
        let elements_params: BTreeSet<String> = map.keys().cloned().collect();

        let missing: Vec<String> = elements_family
            .difference(&elements_params)
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(SsspError::MissingElements(missing));
        }

        let extra: Vec<String> = elements_params
            .difference(&elements_family)
            .cloned()
            .collect();
        if !extra.is_empty() {
            return Err(SsspError::ExtraElements(extra));
        }

        Ok(SsspParameters {
            family_label: family.label().to_string(),
            entries: validate_entries(map)?,
            stored: false,
        })
    }

    /// 从 JSON 文件构造参数
    pub fn create_from_file(path: &Path, family: &SsspFamily) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SsspError::read(path, e))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| SsspError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::new(family, &value)
    }

    /// 从持久化的扁平映射恢复
    pub(crate) fn from_attributes(attributes: &Value) -> Result<Self> {
        let map = attributes.as_object().ok_or_else(|| SsspError::WrongType {
            expected: "object".to_string(),
            found: json_type_name(attributes).to_string(),
        })?;

        let family_label = map
            .get(KEY_FAMILY_LABEL)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SsspError::InvalidArgument(format!("missing `{}` attribute", KEY_FAMILY_LABEL))
            })?
            .to_string();

        let mut elements = map.clone();
        elements.remove(KEY_FAMILY_LABEL);

        Ok(SsspParameters {
            family_label,
            entries: validate_entries(&elements)?,
            stored: false,
        })
    }

    /// 转换为持久化的扁平映射
    pub fn to_attributes(&self) -> Value {
        let mut map = Map::new();
        for (element, metadata) in &self.entries {
            map.insert(element.clone(), metadata_to_value(metadata));
        }
        map.insert(
            KEY_FAMILY_LABEL.to_string(),
            Value::String(self.family_label.clone()),
        );
        Value::Object(map)
    }

    pub fn family_label(&self) -> &str {
        &self.family_label
    }

    /// 修改所属族标签，持久化后不允许
    pub fn set_family_label(&mut self, label: impl Into<String>) -> Result<()> {
        if self.stored {
            return Err(SsspError::ModificationNotAllowed(self.to_string()));
        }
        self.family_label = label.into();
        Ok(())
    }

    pub fn is_stored(&self) -> bool {
        self.stored
    }

    pub(crate) fn mark_stored(&mut self) {
        self.stored = true;
    }

    /// 已配置的元素集合
    pub fn elements(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// 全部元素的参数
    pub fn metadata(&self) -> &BTreeMap<String, ElementMetadata> {
        &self.entries
    }

    /// 指定元素的参数
    pub fn get_metadata(&self, element: &str) -> Result<&ElementMetadata> {
        self.entries
            .get(element)
            .ok_or_else(|| SsspError::ElementNotDefined {
                element: element.to_string(),
                owner: self.to_string(),
            })
    }

    /// 指定元素的截断能
    pub fn get_cutoffs(&self, element: &str) -> Result<Cutoffs> {
        let metadata = self.get_metadata(element)?;
        Ok(Cutoffs {
            wavefunction: metadata.cutoff_wfc,
            charge_density: metadata.cutoff_rho,
            dual: metadata.cutoff_rho / metadata.cutoff_wfc,
        })
    }
}

impl std::fmt::Display for SsspParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SsspParameters<{}>", self.family_label)
    }
}

/// 校验每个元素的字段
fn validate_entries(map: &Map<String, Value>) -> Result<BTreeMap<String, ElementMetadata>> {
    let mut entries = BTreeMap::new();

    for (element, values) in map {
        let values = values.as_object().ok_or_else(|| SsspError::WrongType {
            expected: "object".to_string(),
            found: json_type_name(values).to_string(),
        })?;

        for key in NUMERIC_KEYS.iter().chain(TEXT_KEYS.iter()) {
            if !values.contains_key(*key) {
                return Err(SsspError::MissingKey {
                    element: element.clone(),
                    key: key.to_string(),
                });
            }
        }

        let number = |key: &str| -> Result<f64> {
            let value = values[key]
                .as_f64()
                .ok_or_else(|| SsspError::InvalidFieldType {
                    element: element.clone(),
                    key: key.to_string(),
                    expected: "int or float".to_string(),
                })?;
            // dual = cutoff_rho / cutoff_wfc 要求两者均为正
            if value > 0.0 {
                Ok(value)
            } else {
                Err(SsspError::NonPositiveCutoff {
                    element: element.clone(),
                    key: key.to_string(),
                    value,
                })
            }
        };
        let text = |key: &str| {
            values[key]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| SsspError::InvalidFieldType {
                    element: element.clone(),
                    key: key.to_string(),
                    expected: "str".to_string(),
                })
        };

        let metadata = ElementMetadata {
            cutoff_wfc: number("cutoff_wfc")?,
            cutoff_rho: number("cutoff_rho")?,
            filename: text("filename")?,
            md5: text("md5")?,
        };
        entries.insert(element.clone(), metadata);
    }

    Ok(entries)
}

fn metadata_to_value(metadata: &ElementMetadata) -> Value {
    serde_json::json!({
        "cutoff_wfc": metadata.cutoff_wfc,
        "cutoff_rho": metadata.cutoff_rho,
        "filename": metadata.filename,
        "md5": metadata.md5,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
