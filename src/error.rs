//! # 统一错误处理模块
//!
//! 定义 ssspkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! 每个变体都归入一个 [`ErrorKind`]：参数类型错误 (Type)、语义错误 (Value)、
//! 已有对象上的查找失败 (Key)、持久化后的修改 (Modification)、I/O 与一致性错误。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 参数种类错误
    Type,
    /// 语义校验失败
    Value,
    /// 查找失败
    Key,
    /// 持久化后修改
    Modification,
    /// 文件/序列化错误
    Io,
    /// 仓库内部状态不一致
    Consistency,
}

/// ssspkit 统一错误类型
#[derive(Error, Debug)]
pub enum SsspError {
    // ─────────────────────────────────────────────────────────────
    // 类型错误
    // ─────────────────────────────────────────────────────────────
    #[error("`family` is not a stored instance of `SsspFamily`.")]
    NotStoredFamily,

    #[error("Got object of type {found}, expecting {expected}.")]
    WrongType { expected: String, found: String },

    // ─────────────────────────────────────────────────────────────
    // 参数校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("parameters misses elements present in family: {}", .0.join(", "))]
    MissingElements(Vec<String>),

    #[error("parameters contains elements not present in family: {}", .0.join(", "))]
    ExtraElements(Vec<String>),

    #[error("entry for element `{element}` is missing the `{key}` key")]
    MissingKey { element: String, key: String },

    #[error("`{key}` for element `{element}` is not of type {expected}")]
    InvalidFieldType {
        element: String,
        key: String,
        expected: String,
    },

    #[error("`{key}` for element `{element}` must be a positive number, got {value}")]
    NonPositiveCutoff {
        element: String,
        key: String,
        value: f64,
    },

    // ─────────────────────────────────────────────────────────────
    // 赝势族错误
    // ─────────────────────────────────────────────────────────────
    #[error("family `{label}` already contains a pseudo for element `{element}`")]
    DuplicateElement { label: String, element: String },

    #[error("the pseudos to add contain element `{0}` more than once")]
    DuplicateInBatch(String),

    #[error("the family `{0}` already exists")]
    DuplicateLabel(String),

    #[error("family `{label}` does not contain pseudo for element `{element}`")]
    PseudoNotFound { label: String, element: String },

    #[error("no family with label `{0}` exists")]
    FamilyNotFound(String),

    // ─────────────────────────────────────────────────────────────
    // 导入错误
    // ─────────────────────────────────────────────────────────────
    #[error("`{0}` is not a directory")]
    NotADirectory(String),

    #[error("directory `{dir}` contains pseudo potentials with duplicate elements: `{element}` in {first} and {second}")]
    DuplicateParsedElement {
        dir: String,
        element: String,
        first: String,
        second: String,
    },

    #[error("failed to parse {path}: {reason}")]
    ParseError { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 查找 / 修改错误
    // ─────────────────────────────────────────────────────────────
    #[error("element `{element}` is not defined for `{owner}`")]
    ElementNotDefined { element: String, owner: String },

    #[error("Cannot modify `{0}` after it has been stored")]
    ModificationNotAllowed(String),

    // ─────────────────────────────────────────────────────────────
    // 选择器错误
    // ─────────────────────────────────────────────────────────────
    #[error("unknown SSSP family: {0}")]
    UnknownFamilyChoice(String),

    #[error("cannot {action} while selector is {state}")]
    InvalidTransition { action: String, state: String },

    #[error("stored pseudo for element `{element}` in family `{label}` does not match its checksum")]
    ChecksumMismatch { label: String, element: String },

    #[error("stored family `{label}` contains more than one pseudo for element `{element}`")]
    DuplicateStoredElement { label: String, element: String },

    #[error("More than one family found for {choice}: {}. Something is wrong.", .labels.join(", "))]
    MultipleFamilies { choice: String, labels: Vec<String> },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SsspError {
    /// 返回错误所属分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            SsspError::NotStoredFamily | SsspError::WrongType { .. } => ErrorKind::Type,
            SsspError::ElementNotDefined { .. } => ErrorKind::Key,
            SsspError::ModificationNotAllowed(_) => ErrorKind::Modification,
            SsspError::MultipleFamilies { .. }
            | SsspError::ChecksumMismatch { .. }
            | SsspError::DuplicateStoredElement { .. } => ErrorKind::Consistency,
            SsspError::FileReadError { .. }
            | SsspError::FileWriteError { .. }
            | SsspError::Json { .. }
            | SsspError::CsvError(_) => ErrorKind::Io,
            _ => ErrorKind::Value,
        }
    }

    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        SsspError::FileReadError {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        SsspError::FileWriteError {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, SsspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(SsspError::NotStoredFamily.kind(), ErrorKind::Type);
        assert_eq!(
            SsspError::MissingElements(vec!["Ar".into()]).kind(),
            ErrorKind::Value
        );
        assert_eq!(
            SsspError::ElementNotDefined {
                element: "Br".into(),
                owner: "x".into()
            }
            .kind(),
            ErrorKind::Key
        );
        assert_eq!(
            SsspError::ModificationNotAllowed("x".into()).kind(),
            ErrorKind::Modification
        );
    }

    #[test]
    fn test_element_lists_are_joined() {
        let err = SsspError::ExtraElements(vec!["Br".into(), "Kr".into()]);
        assert_eq!(
            err.to_string(),
            "parameters contains elements not present in family: Br, Kr"
        );
    }
}
