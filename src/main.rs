use clap::Parser;
use foodrag::cli::handlers;
use foodrag::cli::Cli;
use foodrag::cli::Commands;
use foodrag::config::AppConfig;
use foodrag::FoodRag;
use foodrag::FoodRagError;
use foodrag::Result;
use tracing::info;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, using_defaults) = match &cli.config {
        Some(path) => (AppConfig::from_file(path)?, false),
        None => match AppConfig::load() {
            Ok(config) => (config, false),
            Err(FoodRagError::Io(_)) => (AppConfig::default(), true),
            Err(e) => return Err(e),
        },
    };
    if let Some(dataset) = cli.dataset {
        config.data.dataset_path = dataset;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = foodrag::logging::init_logging_with_config(&config.logging)?;
    if using_defaults {
        warn!("No config file found, using built-in defaults");
    }
    info!("foodrag starting");

    if let Commands::Config = cli.command {
        return handlers::handle_config(&config);
    }

    let app = FoodRag::new(config).await?;

    match cli.command {
        Commands::Search {
            query,
            limit,
            floor,
            cuisine,
            max_calories,
        } => handlers::handle_search(&app, query, limit, floor, cuisine, max_calories).await,
        Commands::Ask { query } => handlers::handle_ask(&app, query, cli.verbose).await,
        Commands::Compare { first, second } => handlers::handle_compare(&app, first, second).await,
        Commands::Chat => handlers::handle_chat(&app, cli.verbose).await,
        Commands::Health => handlers::handle_health(&app).await,
        Commands::Config => handlers::handle_config(app.config()),
    }
}
