use clap::Parser;
use nyayarag::cli::handle_analyze_command;
use nyayarag::cli::handle_ask_command;
use nyayarag::cli::handle_config_command;
use nyayarag::cli::handle_serve_api;
use nyayarag::cli::handle_verify_command;
use nyayarag::cli::print_error;
use nyayarag::cli::Cli;
use nyayarag::cli::Commands;
use nyayarag::config::AppConfig;
use nyayarag::Result;
use tracing::info;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging with configuration
    nyayarag::logging::init_logging_with_config(&config.logging, cli.verbose)?;
    info!("NyayaRAG v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Ask {
            query,
            evidence,
            top_k,
            json,
        } => handle_ask_command(&config, &query, evidence.as_deref(), top_k, json).await,
        Commands::Analyze { file } => handle_analyze_command(&config, &file).await,
        Commands::Verify { file, json } => handle_verify_command(&config, &file, json).await,
        Commands::Serve { host, port, cors } => handle_serve_api(&config, host, port, cors).await,
        Commands::Config => handle_config_command(&config),
    }
}
