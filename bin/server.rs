// Secondary Market Analysis - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use clap::Parser;
use secondary_market::api::{router, AppState};
use secondary_market::{MemoFormatter, MemoSettings};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "memo-server")]
#[command(about = "REST API for secondary-market transaction analysis", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "SMA_BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Memo header settings (JSON)
    #[arg(long, env = "SMA_MEMO_SETTINGS")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("secondary_market=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    println!("🌐 Secondary Market Analysis - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let settings = match &args.settings {
        Some(path) => {
            let settings = MemoSettings::from_file(path)?;
            println!("✓ Memo settings loaded: {:?}", path);
            settings
        }
        None => MemoSettings::default(),
    };

    let app = router(AppState::new(MemoFormatter::new(settings)));

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind to address: {}", args.bind))?;

    info!(addr = %args.bind, "server listening");
    println!("\n🚀 Server running on http://{}", args.bind);
    println!("   API: http://{}/api/analyze", args.bind);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
