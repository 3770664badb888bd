mod archive;
mod config;
mod error;
mod fetcher;
mod orchestrator;
mod parser;
mod pipeline;
mod report;
mod scheduler;
mod source;
mod types;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::HttpPageFetcher;
use crate::pipeline::Pipeline;
use crate::scheduler::Scheduler;
use crate::source::XlsxCategorySource;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let source = XlsxCategorySource::new(&cfg.product_list_path);
    let fetcher = HttpPageFetcher::new(&cfg)?;
    let pipeline = Pipeline::new(&cfg, source, fetcher);

    info!(
        site = %cfg.site_url,
        platform = %cfg.platform,
        every_hours = cfg.run_frequency_hours,
        max_pages = cfg.max_pages,
        "Scanner ready: product list {}, archive {}, reports in {}",
        cfg.product_list_path.display(),
        cfg.archive_dir.display(),
        cfg.report_dir.display(),
    );

    let scheduler = Scheduler::new(pipeline, cfg.run_frequency_hours, cfg.poll_interval());

    tokio::select! {
        _ = scheduler.run() => {}
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("Shutdown requested, exiting");
        }
    }

    Ok(())
}
