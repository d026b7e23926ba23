//! DigiFacts - serve random DigiByte facts
//!
//! Runs the HTTP server that embeds facts into a host page, or prints a single
//! rendered fact or the supported languages from the command line.

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use digifacts::cli::{self, Cli, Command};
use digifacts::refresh::{RefreshConfig, RefreshHandle};
use digifacts::{server, DigiFacts, HttpFactSource};

/// Installs the log subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = match cli::load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    init_tracing(&settings.log_level);

    let source = HttpFactSource::with_base_url(settings.api_base_url.clone());
    let app = Arc::new(DigiFacts::new(settings.clone(), source));

    match cli.command() {
        Command::Serve { .. } => {
            if let Err(e) = app.prefetch().await {
                warn!(error = %e, "Prefetch failed; facts will be fetched on demand");
            }

            let refresh = RefreshHandle::spawn(
                Arc::clone(&app),
                RefreshConfig::from(&settings.refresh),
            );
            server::serve(Arc::clone(&app), settings.listen_addr).await?;
            refresh.shutdown().await;
        }
        Command::Show => {
            println!("{}", app.render_fragment().await);
        }
        Command::Languages => {
            let languages = app.catalog().refresh().await?;
            for code in languages.iter() {
                println!("{}", code);
            }
        }
    }

    Ok(())
}
