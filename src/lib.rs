pub mod config;
pub mod normalizer;

pub use config::NormalizerConfig;
pub use normalizer::{
    available_tables, builtin_table, AppliedRule, EmptyPatternPolicy, NormalizationResult,
    NormalizeOptions, Normalizer, ReplacementTable, UnicodeForm,
};
