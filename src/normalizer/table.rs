//! 替换表
//!
//! 有序的 (old, new) 对序列。顺序、重复条目均按原样保留，不做去重与校验。

use serde::{Deserialize, Serialize};

/// 替换表
///
/// JSON 形式为二元数组的数组：`[["ä","ae"],["ö","oe"]]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementTable {
    pairs: Vec<(String, String)>,
}

impl ReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从任意 (old, new) 序列构建
    pub fn from_pairs<I, O, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (O, N)>,
        O: Into<String>,
        N: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        }
    }

    /// 追加另一张表（保持两者各自的顺序）
    pub fn extend(&mut self, other: ReplacementTable) {
        self.pairs.extend(other.pairs);
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(old, new)| (old.as_str(), new.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

impl From<Vec<(String, String)>> for ReplacementTable {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl From<&[(&str, &str)]> for ReplacementTable {
    fn from(pairs: &[(&str, &str)]) -> Self {
        Self::from_pairs(pairs.iter().copied())
    }
}

impl<O: Into<String>, N: Into<String>> FromIterator<(O, N)> for ReplacementTable {
    fn from_iter<T: IntoIterator<Item = (O, N)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}
