//! 文本规范化层
//!
//! 基于有序替换表的确定性文本变换。
//!
//! ## 处理流程
//! 1. 可选 Unicode 归一化（NFC）
//! 2. 按表顺序逐条执行全部替换（左到右、非重叠）
//! 3. 后续规则作用于前面规则的输出

mod engine;
mod rules;
mod table;
mod types;

pub use engine::Normalizer;
pub use rules::{available_tables, builtin_table};
pub use table::ReplacementTable;
pub use types::{
    AppliedRule, EmptyPatternPolicy, NormalizationResult, NormalizeOptions, UnicodeForm,
};
