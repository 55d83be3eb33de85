use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lyrics_fetch_rs::app::App;
use lyrics_fetch_rs::config::Config;

/// 根据歌手和歌名获取歌词，结果以 JSON 输出到标准输出
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 歌手
    artist: Option<String>,

    /// 歌名
    title: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 日志输出到 stderr，stdout 只留给 JSON 结果
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = Config::load(cli.config.clone())?;
    debug!("已加载歌词源: {:?}", config.lyrics_sources);

    let app = App::from_config(&config);
    let outcome = app.run(cli.artist.as_deref(), cli.title.as_deref()).await;

    println!("{}", outcome.body);
    Ok(ExitCode::from(outcome.exit_code))
}
