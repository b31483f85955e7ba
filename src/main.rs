// 命令行工具 - 按配置的替换表规范化标准输入
use anyhow::Result;
use std::io::{Read, Write};
use std::path::PathBuf;

use txng_normalizer::NormalizerConfig;

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，避免污染规范化结果）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    // 1. 加载配置：指定路径或默认路径
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            if !path.exists() {
                anyhow::bail!("配置文件不存在: {:?}", path);
            }
            NormalizerConfig::load_from_path(&path)?
        }
        None => NormalizerConfig::load()?,
    };

    // 2. 构建规范化器
    let normalizer = config.build_normalizer()?;

    // 3. 读取标准输入
    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;

    // 4. 规范化并输出
    let result = normalizer.normalize_detailed(&text);
    tracing::info!(
        "规范化完成: changed={}, 命中规则 {} 条, 耗时 {}us",
        result.changed,
        result.applied.len(),
        result.elapsed_us
    );

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(result.text.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
