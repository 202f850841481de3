//! # 数据模型模块
//!
//! 定义赝势记录、赝势族与推荐参数的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `store/`, `importer.rs`, `selector/`, `commands/` 使用
//! - 子模块: element, pseudo, family, parameters

pub mod element;
pub mod family;
pub mod parameters;
pub mod pseudo;

pub use family::SsspFamily;
pub use parameters::SsspParameters;
pub use pseudo::PseudoRecord;
