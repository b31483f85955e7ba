//! 规范化主引擎
//!
//! 按表顺序逐条执行"全部替换"，后一条规则作用于前一条的输出

use std::borrow::Cow;
use std::time::Instant;

use aho_corasick::{AhoCorasick, MatchKind};
use anyhow::Result;
use unicode_normalization::UnicodeNormalization;

use crate::normalizer::table::ReplacementTable;
use crate::normalizer::types::{
    AppliedRule, EmptyPatternPolicy, NormalizationResult, NormalizeOptions, UnicodeForm,
};

/// 单条规则的匹配方式
#[derive(Debug)]
enum Matcher {
    /// 预编译自动机（LeftmostFirst，非重叠）
    Automaton(AhoCorasick),
    /// 自动机构建失败时回退到 `str::replace`
    Literal(String),
    /// 空模式，按 `str::replace("", new)` 语义穿插
    Interleave,
    /// 空模式，跳过
    Skip,
}

/// 预编译规则
#[derive(Debug)]
struct CompiledRule {
    /// 在替换表中的位置
    index: usize,
    matcher: Matcher,
    replacement: String,
}

impl CompiledRule {
    fn compile(index: usize, old: &str, new: &str, options: &NormalizeOptions) -> Self {
        let pattern = compose(old, options.unicode_form).into_owned();
        let replacement = compose(new, options.unicode_form).into_owned();

        let matcher = if pattern.is_empty() {
            match options.empty_pattern {
                EmptyPatternPolicy::Interleave => Matcher::Interleave,
                // Reject 已在构造入口处理
                EmptyPatternPolicy::Skip | EmptyPatternPolicy::Reject => {
                    tracing::warn!("替换表第 {} 条的 old 为空，已跳过", index);
                    Matcher::Skip
                }
            }
        } else {
            match AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostFirst)
                .build([pattern.as_str()])
            {
                Ok(ac) => Matcher::Automaton(ac),
                Err(e) => {
                    tracing::warn!("替换表第 {} 条编译失败，回退到逐串替换: {}", index, e);
                    Matcher::Literal(pattern)
                }
            }
        };

        Self {
            index,
            matcher,
            replacement,
        }
    }

    /// 对文本执行本条规则
    ///
    /// 返回 Some((新文本, 替换次数))；无命中时返回 None
    fn apply(&self, text: &str) -> Option<(String, usize)> {
        match &self.matcher {
            Matcher::Automaton(ac) => {
                let mut result = String::with_capacity(text.len());
                let mut last_end = 0;
                let mut count = 0;

                for m in ac.find_iter(text) {
                    result.push_str(&text[last_end..m.start()]);
                    result.push_str(&self.replacement);
                    last_end = m.end();
                    count += 1;
                }

                if count == 0 {
                    return None;
                }

                // 添加剩余文本
                result.push_str(&text[last_end..]);
                Some((result, count))
            }
            Matcher::Literal(pattern) => {
                let count = text.matches(pattern.as_str()).count();
                if count == 0 {
                    return None;
                }
                Some((text.replace(pattern.as_str(), &self.replacement), count))
            }
            Matcher::Interleave => {
                let count = text.chars().count() + 1;
                Some((text.replace("", &self.replacement), count))
            }
            Matcher::Skip => None,
        }
    }
}

/// 按选项做 Unicode 归一化
fn compose(text: &str, form: UnicodeForm) -> Cow<'_, str> {
    match form {
        UnicodeForm::None => Cow::Borrowed(text),
        UnicodeForm::Nfc => Cow::Owned(text.nfc().collect()),
    }
}

/// 规范化器（可复用，构造后不可变）
///
/// 持有原始替换表与每条规则的预编译匹配器。无内部可变状态，可跨线程共享。
#[derive(Debug)]
pub struct Normalizer {
    /// 构造时传入的原始替换表
    table: ReplacementTable,
    /// 与 table 一一对应的预编译规则
    rules: Vec<CompiledRule>,
    options: NormalizeOptions,
}

impl Normalizer {
    /// 创建规范化器
    ///
    /// 不做任何校验，不会失败；空表得到恒等变换
    pub fn new(table: impl Into<ReplacementTable>) -> Self {
        Self::compile(table.into(), NormalizeOptions::default())
    }

    /// 按指定选项创建规范化器
    ///
    /// 仅当策略为 [`EmptyPatternPolicy::Reject`] 且存在空 old 时返回错误
    pub fn with_options(
        table: impl Into<ReplacementTable>,
        options: NormalizeOptions,
    ) -> Result<Self> {
        let table = table.into();

        if options.empty_pattern == EmptyPatternPolicy::Reject {
            if let Some(index) = table.iter().position(|(old, _)| old.is_empty()) {
                anyhow::bail!("替换表第 {} 条的 old 为空", index);
            }
        }

        Ok(Self::compile(table, options))
    }

    fn compile(table: ReplacementTable, options: NormalizeOptions) -> Self {
        let rules: Vec<CompiledRule> = table
            .iter()
            .enumerate()
            .map(|(index, (old, new))| CompiledRule::compile(index, old, new, &options))
            .collect();

        tracing::debug!(
            "规范化器已构建: {} 条规则, options: {:?}",
            rules.len(),
            options
        );

        Self {
            table,
            rules,
            options,
        }
    }

    /// 获取构造时传入的替换表（顺序、重复条目不变）
    pub fn table(&self) -> &ReplacementTable {
        &self.table
    }

    pub fn options(&self) -> NormalizeOptions {
        self.options
    }

    /// 规范化文本
    ///
    /// 纯函数，不可失败
    pub fn normalize(&self, text: &str) -> String {
        let mut current = compose(text, self.options.unicode_form);

        for rule in &self.rules {
            if let Some((replaced, _)) = rule.apply(&current) {
                current = Cow::Owned(replaced);
            }
        }

        current.into_owned()
    }

    /// 逐词规范化，保持顺序与数量
    pub fn normalize_words<I, S>(&self, words: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .map(|word| self.normalize(word.as_ref()))
            .collect()
    }

    /// 规范化文本并记录每条规则的命中次数
    pub fn normalize_detailed(&self, text: &str) -> NormalizationResult {
        let start = Instant::now();

        let mut current = compose(text, self.options.unicode_form);
        let mut applied = Vec::new();

        for rule in &self.rules {
            if let Some((replaced, count)) = rule.apply(&current) {
                current = Cow::Owned(replaced);

                let (old, new) = &self.table.as_slice()[rule.index];
                applied.push(AppliedRule {
                    index: rule.index,
                    old: old.clone(),
                    new: new.clone(),
                    count,
                });
            }
        }

        let elapsed_us = start.elapsed().as_micros() as u64;
        let changed = current != text;

        if !changed && applied.is_empty() {
            return NormalizationResult::unchanged(current.into_owned(), elapsed_us);
        }

        NormalizationResult {
            text: current.into_owned(),
            changed,
            applied,
            elapsed_us,
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(ReplacementTable::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "the quick brown fox jumps over the lazy dog";

    /// 期望值：按表顺序依次 `str::replace`
    fn do_test(text: &str, pairs: &[(&str, &str)]) {
        let normalizer = Normalizer::new(pairs);
        let got = normalizer.normalize(text);

        let expected = pairs
            .iter()
            .fold(text.to_string(), |acc, (old, new)| acc.replace(old, new));

        assert_eq!(got, expected);
    }

    #[test]
    fn test_table_roundtrip() {
        let normalizer = Normalizer::new(ReplacementTable::new());
        assert!(normalizer.table().is_empty());

        let pairs: &[(&str, &str)] = &[("a", "b"), ("c", "d"), ("a", "b")];
        let normalizer = Normalizer::new(pairs);
        assert_eq!(normalizer.table(), &ReplacementTable::from(pairs));
        assert_eq!(normalizer.table().len(), 3);
    }

    #[test]
    fn test_simple_pairs() {
        do_test(FOX, &[("a", "b"), ("c", "d")]);
        assert_eq!(
            Normalizer::new(&[("a", "b"), ("c", "d")][..]).normalize(FOX),
            "the quidk brown fox jumps over the lbzy dog"
        );
    }

    #[test]
    fn test_chained_pairs() {
        do_test(FOX, &[("a", "bb"), ("bb", "cc")]);

        let normalizer = Normalizer::new(&[("a", "bb"), ("bb", "cc")][..]);
        assert_eq!(normalizer.normalize("lazy"), "lcczy");
    }

    #[test]
    fn test_absent_pattern() {
        do_test(FOX, &[("foo", "bar")]);
        assert_eq!(Normalizer::new(&[("foo", "bar")][..]).normalize(FOX), FOX);
    }

    #[test]
    fn test_umlauts() {
        let text = "Bei den dreitägigen Angriffen seien auch bis\
                    auf einen alle Flugplätze der Taliban zerstört worden";
        do_test(text, &[("ä", "ae"), ("ö", "oe")]);

        let got = Normalizer::new(&[("ä", "ae"), ("ö", "oe")][..]).normalize(text);
        assert!(got.contains("dreitaegigen"));
        assert!(got.contains("Flugplaetze"));
        assert!(got.contains("zerstoert"));
        assert_eq!(got.chars().count(), text.chars().count() + 3);
    }

    #[test]
    fn test_empty_table_is_identity() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize(FOX), FOX);
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn test_non_overlapping_scan() {
        // "aaa" 中 "aa" 只命中一次，剩余 "a" 不再参与
        do_test("aaa", &[("aa", "b")]);
        assert_eq!(Normalizer::new(&[("aa", "b")][..]).normalize("aaaa"), "bb");
        assert_eq!(Normalizer::new(&[("aba", "x")][..]).normalize("ababa"), "xba");
    }

    #[test]
    fn test_empty_pattern_skip() {
        let normalizer = Normalizer::new(&[("", "x"), ("a", "b")][..]);
        assert_eq!(normalizer.normalize("abc"), "bbc");
        // 空模式条目仍保留在表中
        assert_eq!(normalizer.table().len(), 2);
    }

    #[test]
    fn test_empty_pattern_reject() {
        let options = NormalizeOptions {
            empty_pattern: EmptyPatternPolicy::Reject,
            ..Default::default()
        };
        let err = Normalizer::with_options(&[("a", "b"), ("", "x")][..], options).unwrap_err();
        assert!(err.to_string().contains('1'));

        assert!(Normalizer::with_options(&[("a", "b")][..], options).is_ok());
    }

    #[test]
    fn test_empty_pattern_interleave() {
        let options = NormalizeOptions {
            empty_pattern: EmptyPatternPolicy::Interleave,
            ..Default::default()
        };
        let normalizer = Normalizer::with_options(&[("", "-")][..], options).unwrap();
        assert_eq!(normalizer.normalize("äb"), "-ä-b-");
        assert_eq!(normalizer.normalize(""), "-");

        let result = normalizer.normalize_detailed("äb");
        assert_eq!(result.applied[0].count, 3);
    }

    #[test]
    fn test_nfc_matches_decomposed_input() {
        let decomposed = "Fluggera\u{308}t";

        // 默认按码点匹配，分解形式不命中
        let raw = Normalizer::new(&[("ä", "ae")][..]);
        assert_eq!(raw.normalize(decomposed), decomposed);

        let options = NormalizeOptions {
            unicode_form: UnicodeForm::Nfc,
            ..Default::default()
        };
        let nfc = Normalizer::with_options(&[("ä", "ae")][..], options).unwrap();
        assert_eq!(nfc.normalize(decomposed), "Fluggeraet");
        assert_eq!(nfc.table(), raw.table());
    }

    #[test]
    fn test_normalize_words() {
        let normalizer = Normalizer::new(&[("ä", "ae"), ("ö", "oe")][..]);
        let words = normalizer.normalize_words(["Flugplätze", "", "zerstört", "Taliban"]);
        assert_eq!(words, vec!["Flugplaetze", "", "zerstoert", "Taliban"]);
    }

    #[test]
    fn test_normalize_detailed() {
        let normalizer = Normalizer::new(&[("a", "bb"), ("foo", "bar"), ("bb", "cc")][..]);
        let result = normalizer.normalize_detailed(FOX);

        assert!(result.changed);
        assert_eq!(result.text, normalizer.normalize(FOX));
        assert_eq!(
            result.applied,
            vec![
                AppliedRule {
                    index: 0,
                    old: "a".to_string(),
                    new: "bb".to_string(),
                    count: 1,
                },
                AppliedRule {
                    index: 2,
                    old: "bb".to_string(),
                    new: "cc".to_string(),
                    count: 1,
                },
            ]
        );

        let result = normalizer.normalize_detailed("xyz");
        assert!(!result.changed);
        assert!(result.applied.is_empty());
        assert_eq!(result.text, "xyz");
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let normalizer = Arc::new(Normalizer::new(&[("ä", "ae")][..]));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let normalizer = Arc::clone(&normalizer);
                std::thread::spawn(move || normalizer.normalize("Mädchen"))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "Maedchen");
        }
    }
}
