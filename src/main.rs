use anyhow::Result;
use clap::Parser;
use deepresearch_rs::{cli, launch, utils::logging::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // .env中的密钥优先加载，配置默认值会读取这些环境变量
    dotenvy::dotenv().ok();

    let args = cli::Args::parse();
    let surface = args.surface();
    let config = args.into_config()?;

    init_tracing(config.verbose);

    launch(&config, surface).await
}
