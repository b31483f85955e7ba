//! 内置替换表
//!
//! 按语言代码提供常用的转写表

use std::collections::BTreeMap;

use crate::normalizer::table::ReplacementTable;

lazy_static::lazy_static! {
    /// 语言代码 → 替换规则（BTreeMap 保证列举时有序）
    static ref BUILTIN_TABLES: BTreeMap<&'static str, &'static [(&'static str, &'static str)]> =
        BTreeMap::from([
            ("de", GERMAN),
            ("fr", FRENCH),
        ]);
}

/// 德语：变音字母与 ß 转写
const GERMAN: &[(&str, &str)] = &[
    ("ä", "ae"),
    ("ö", "oe"),
    ("ü", "ue"),
    ("Ä", "Ae"),
    ("Ö", "Oe"),
    ("Ü", "Ue"),
    ("ß", "ss"),
];

/// 法语：去除重音、拆分连字
const FRENCH: &[(&str, &str)] = &[
    ("à", "a"),
    ("â", "a"),
    ("ç", "c"),
    ("é", "e"),
    ("è", "e"),
    ("ê", "e"),
    ("ë", "e"),
    ("î", "i"),
    ("ï", "i"),
    ("ô", "o"),
    ("ù", "u"),
    ("û", "u"),
    ("ü", "u"),
    ("ÿ", "y"),
    ("œ", "oe"),
    ("æ", "ae"),
];

/// 获取内置替换表
///
/// 语言代码不区分大小写；未知代码返回 None
pub fn builtin_table(lang: &str) -> Option<ReplacementTable> {
    BUILTIN_TABLES
        .get(lang.to_lowercase().as_str())
        .map(|pairs| ReplacementTable::from(*pairs))
}

/// 所有内置表的语言代码（已排序）
pub fn available_tables() -> Vec<&'static str> {
    BUILTIN_TABLES.keys().copied().collect()
}
