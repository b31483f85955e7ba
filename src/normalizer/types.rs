//! 规范化类型定义

use serde::{Deserialize, Serialize};

/// 空模式（old 为空串）处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPatternPolicy {
    /// 跳过（默认）：条目保留在表中，但不参与替换
    #[default]
    Skip,
    /// 拒绝：构造时报错
    Reject,
    /// 穿插：与 `str::replace("", new)` 一致，在每个字符前及末尾插入 new
    Interleave,
}

/// 匹配前的 Unicode 归一化形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnicodeForm {
    /// 不做归一化，按码点原样匹配（默认）
    #[default]
    None,
    /// 替换表模式与输入文本均先组合为 NFC
    Nfc,
}

/// 规范化选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NormalizeOptions {
    #[serde(default)]
    pub empty_pattern: EmptyPatternPolicy,
    #[serde(default)]
    pub unicode_form: UnicodeForm,
}

/// 单条规则的命中记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRule {
    /// 在替换表中的位置
    pub index: usize,
    pub old: String,
    pub new: String,
    /// 本条规则完成的替换次数
    pub count: usize,
}

/// 规范化结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationResult {
    /// 规范化后的文本
    pub text: String,
    /// 是否有改动
    pub changed: bool,
    /// 命中的规则（按表顺序）
    pub applied: Vec<AppliedRule>,
    /// 处理耗时（微秒）
    pub elapsed_us: u64,
}

impl NormalizationResult {
    /// 创建无修改的结果
    pub fn unchanged(text: String, elapsed_us: u64) -> Self {
        Self {
            text,
            changed: false,
            applied: Vec::new(),
            elapsed_us,
        }
    }
}
