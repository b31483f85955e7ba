// src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::normalizer::{
    builtin_table, EmptyPatternPolicy, NormalizeOptions, Normalizer, ReplacementTable,
    UnicodeForm,
};

pub const CONFIG_DIRNAME: &str = "TxngNormalizer";
pub const CONFIG_FILENAME: &str = "normalizer.json";

// ============================================================================
// 规范化配置
// ============================================================================

/// 规范化配置
///
/// 生效的替换表 = 内置语言表（如有）+ 自定义 table，顺序依次拼接
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// 内置表语言代码（如 "de"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// 自定义替换表
    #[serde(default)]
    pub table: ReplacementTable,
    /// 空模式处理策略
    #[serde(default)]
    pub empty_pattern: EmptyPatternPolicy,
    /// 匹配前的 Unicode 归一化
    #[serde(default)]
    pub unicode_form: UnicodeForm,
}

impl NormalizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        let app_dir = config_dir.join(CONFIG_DIRNAME);
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join(CONFIG_FILENAME))
    }

    /// 从默认路径加载；文件不存在时返回默认配置
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            tracing::warn!("配置文件不存在，使用默认配置: {:?}", path);
            Ok(Self::new())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        tracing::info!("尝试从以下路径加载配置: {:?}", path);

        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("读取配置文件失败 {:?}: {}", path, e))?;
        let config: NormalizerConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("解析配置文件失败 {:?}: {}", path, e))?;

        // 提前暴露未知语言代码
        config.effective_table()?;

        tracing::info!(
            "配置加载完成: language={:?}, 自定义规则 {} 条",
            config.language,
            config.table.len()
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to_path(&path)
    }

    /// 原子写入：先写临时文件，再替换目标文件
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tracing::info!("保存配置到: {:?}", path);

        let temp_path = path.with_extension("json.tmp");
        let backup_path = path.with_extension("json.bak");

        std::fs::write(&temp_path, &content).map_err(|e| {
            tracing::error!("写入临时文件失败: {}", e);
            e
        })?;

        if path.exists() {
            if backup_path.exists() {
                let _ = std::fs::remove_file(&backup_path);
            }
            std::fs::rename(path, &backup_path).map_err(|e| {
                tracing::error!("备份旧配置文件失败: {}", e);
                e
            })?;
        }

        match std::fs::rename(&temp_path, path) {
            Ok(_) => {
                let _ = std::fs::remove_file(&backup_path);
                tracing::info!("配置保存成功");
                Ok(())
            }
            Err(e) => {
                tracing::error!("重命名临时文件失败: {}", e);
                if backup_path.exists() {
                    if let Err(restore_err) = std::fs::rename(&backup_path, path) {
                        tracing::error!("恢复备份失败: {}", restore_err);
                    } else {
                        tracing::info!("已从备份恢复配置");
                    }
                }
                Err(e.into())
            }
        }
    }

    pub fn options(&self) -> NormalizeOptions {
        NormalizeOptions {
            empty_pattern: self.empty_pattern,
            unicode_form: self.unicode_form,
        }
    }

    /// 生效的替换表
    pub fn effective_table(&self) -> Result<ReplacementTable> {
        let mut table = match &self.language {
            Some(lang) => builtin_table(lang)
                .ok_or_else(|| anyhow::anyhow!("未知的内置表语言: {}", lang))?,
            None => ReplacementTable::new(),
        };
        table.extend(self.table.clone());
        Ok(table)
    }

    pub fn build_normalizer(&self) -> Result<Normalizer> {
        Normalizer::with_options(self.effective_table()?, self.options())
    }
}
