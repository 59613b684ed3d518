use anyhow::Result;
use clap::Parser;
use photopoet::app::App;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "photopoet")]
#[command(about = "Generate a poem describing a photo")]
struct CliArgs {
    /// Path to the photo to describe (JPEG, PNG, WebP, or GIF).
    #[arg(value_name = "PHOTO")]
    photo: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photopoet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting photopoet");

    let args = CliArgs::parse();

    match App::new() {
        Ok(mut app) => match app.run(&args.photo).await {
            Ok(poem) => {
                println!("{}", poem);
                Ok(())
            }
            Err(e) => {
                error!("Poem generation failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    }
}
