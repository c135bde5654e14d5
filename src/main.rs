use anyhow::{Context, Result};
use clap::Parser;
use theo_run::{create_router, AppState, Config};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "theo-run", about = "Simulated GPS run tracker with a voice assistant")]
struct Args {
    /// Config file path (extension optional)
    #[arg(short, long, default_value = "config/theo-run")]
    config: String,

    /// Seed for the simulated GPS walk, overrides the config file
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if args.seed.is_some() {
        cfg.tracker.seed = args.seed;
    }

    info!("Theo Run v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);
    info!(
        "Assistant: enabled={}, every {}",
        cfg.assistant.enabled,
        cfg.assistant.trigger_label()
    );
    match cfg.tracker.seed {
        Some(seed) => info!("Simulated GPS seeded with {}", seed),
        None => info!("Simulated GPS seeded from entropy"),
    }

    let state = AppState::new(cfg.assistant, cfg.tracker);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
