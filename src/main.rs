use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use hostwatch::readers::read_hostname;
use hostwatch::{
    History, MetricSource, PageOptions, Procfs, Sampler, ServerContext, Settings, StatusServer,
};

#[derive(Parser, Debug)]
#[command(name = "hostwatch")]
#[command(about = "Single-host resource monitor with a status page and sample history")]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:61208
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    log_level: Option<String>,

    /// Print the current readings as JSON and exit
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }
    if let Some(level) = args.log_level {
        settings.log_level = level;
    }
    settings.validate()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let source = Procfs::new();

    if args.once {
        return print_overview(&source);
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(settings, Arc::new(source)))
}

/// Print one set of readings and exit
fn print_overview(source: &dyn MetricSource) -> Result<()> {
    let overview = source.overview();
    println!("{}", serde_json::to_string_pretty(&overview)?);
    Ok(())
}

/// Sample in the background and serve until interrupted
async fn run(settings: Settings, source: Arc<dyn MetricSource>) -> Result<()> {
    let history = Arc::new(History::new(settings.capacity, settings.cadence()));
    let sampler = Sampler::new(history.clone(), source.clone()).start();

    let title = settings
        .title
        .clone()
        .or_else(read_hostname)
        .unwrap_or_else(|| "hostwatch".to_string());

    let page = PageOptions {
        title,
        refresh_secs: settings.page_refresh_secs,
        cadence_secs: settings.cadence_secs,
        ..PageOptions::default()
    };

    let server = StatusServer::new(
        settings.bind_addr()?,
        ServerContext {
            history,
            source,
            page: Arc::new(page),
        },
    );
    let listener = server.bind().await?;

    tokio::select! {
        () = server.serve(listener) => {}
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("interrupted, shutting down"),
                Err(e) => warn!(error = %e, "failed to listen for ctrl-c, shutting down"),
            }
        }
    }

    sampler.shutdown().await;
    Ok(())
}
