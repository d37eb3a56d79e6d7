use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lostfound::{build_router, Container, ContainerConfig};

#[derive(Parser)]
#[command(name = "lostfound")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,

    /// Address to bind the HTTP server to.
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Base URL of the Supabase project (auth, storage and database).
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Anonymous API key for the Supabase project.
    #[arg(long, env = "SUPABASE_ANON_KEY")]
    supabase_anon_key: Option<String>,

    /// Storage bucket holding item images.
    #[arg(long, env = "LOSTFOUND_BUCKET", default_value = "items")]
    bucket: String,

    /// Hugging Face model id for the CLIP embedding pipeline.
    #[arg(long, env = "LOSTFOUND_MODEL_ID")]
    model_id: Option<String>,

    /// Use deterministic mock embeddings instead of the ONNX pipeline.
    #[arg(long)]
    mock_embeddings: bool,

    /// Keep items, images and sessions in memory (dev mode, no Supabase).
    #[arg(long)]
    memory_storage: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Arc::new(Container::new(ContainerConfig {
        supabase_url: cli.supabase_url,
        supabase_anon_key: cli.supabase_anon_key,
        bucket: cli.bucket,
        model_id: cli.model_id,
        mock_embeddings: cli.mock_embeddings,
        memory_storage: cli.memory_storage,
    })?);

    let router = build_router(container);

    let listener = tokio::net::TcpListener::bind(&cli.addr).await?;
    info!("Listening on {}", cli.addr);

    axum::serve(listener, router).await?;

    Ok(())
}
