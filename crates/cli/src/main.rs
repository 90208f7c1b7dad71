//! # Odometry Logger CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 录制的 host trace 回放 (驱动 logger 生命周期钩子)
//! - 优雅关闭处理

mod cli;
mod commands;
mod replay;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_replay, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        ..ObservabilityConfig::default().with_verbosity(cli.verbose, cli.quiet)
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Odometry Logger CLI starting"
    );

    let result = match &cli.command {
        Commands::Replay(args) => run_replay(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
