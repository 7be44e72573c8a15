use anyhow::Result;
use fill_blank_form::utils::logging;
use fill_blank_form::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置（可选的 fill_blank.toml，环境变量优先）
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fill_blank.toml".to_string());
    let config = Config::load(&config_path)?;

    // 初始化日志（终端 + 日志文件）
    logging::init(config.verbose_logging, &config.output_log_file)?;

    // 初始化并运行应用
    let stats = App::initialize(config)?.run().await?;
    if stats.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
