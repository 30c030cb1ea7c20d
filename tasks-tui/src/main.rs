use anyhow::Result;
use clap::Parser;
use tasks_core::{Config, TaskApi};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod ui;

#[derive(Parser)]
#[command(name = "tasks", about = "Terminal client for the tasks REST backend", version)]
struct Args {
    /// Base URL of the task collection (falls back to TASKS_API_URL, then
    /// http://localhost:3000/tasks)
    #[arg(long)]
    api_url: Option<String>,

    /// Log filter (tracing env-filter syntax)
    #[arg(long, env = "TASKS_LOG", default_value = "warn")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never fight the terminal UI.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .with_writer(std::io::stderr)
        .init();

    let config = match args.api_url {
        Some(api_url) => Config { api_url },
        None => Config::from_env(),
    };

    info!(api_url = %config.api_url, "starting tasks client");
    let api = TaskApi::new(config.api_url)?;

    ui::run_app(api).await?;

    Ok(())
}
