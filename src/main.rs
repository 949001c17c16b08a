mod cli;

use crate::cli::{Cli, Commands};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use brand_extractor::application::use_cases::RunApplicationUseCase;
use brand_extractor::config::{AppConfig, RemoteServiceConfig};
use brand_extractor::debug::{init_logging, log_error_details};
use brand_extractor::domain::design::ProductType;
use brand_extractor::infrastructure::remote::GeminiDesignService;
use brand_extractor::interfaces::console::{self, ConsoleAction, ConsoleRun, ImageSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let debug_config = cli.debug_config();
    if let Err(e) = init_logging(&debug_config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // 認証情報が無い場合は起動しない
    let remote = RemoteServiceConfig::new(cli.resolved_api_key())
        .with_base_url(cli.base_url.clone())
        .with_timeout_secs(cli.timeout);
    let config = AppConfig::new(remote);
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let outcome = match cli.command {
        Commands::Serve { port, host } => {
            info!("Starting application...");
            RunApplicationUseCase::new(config.with_server(host, port))
                .execute()
                .await
        }
        Commands::Describe { product, source } => {
            run_console(&config, product, source.into(), ConsoleAction::Describe, PathBuf::from(".")).await
        }
        Commands::Recreate {
            product,
            output,
            source,
        } => run_console(&config, product, source.into(), ConsoleAction::Recreate, output).await,
        Commands::Extract {
            product,
            output,
            source,
        } => run_console(&config, product, source.into(), ConsoleAction::Extract, output).await,
    };

    match outcome {
        Ok(_) => {
            info!("Application terminated normally");
        }
        Err(e) => {
            log_error_details(e.as_ref(), "Application failed");
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run_console(
    config: &AppConfig,
    product: ProductType,
    source: ImageSource,
    action: ConsoleAction,
    output: PathBuf,
) -> anyhow::Result<()> {
    let service = Arc::new(GeminiDesignService::new(&config.remote)?);
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());

    console::run(
        service,
        ConsoleRun {
            source,
            product,
            action,
            output,
        },
        &mut stdin,
    )
    .await?;
    Ok(())
}
