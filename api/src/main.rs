mod api_handlers;
mod config;
mod database;
mod request_logging;
mod search;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::ServerConfig;
use database::Database;
use poem::{listener::TcpListener, middleware::Cors, Endpoint, EndpointExt, Route, Server};
use request_logging::RequestLogging;
use search::{compile, parse_params, render_sql, RawSearchParams};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "places-server")]
#[command(about = "Place catalog search API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Parse and compile a search without touching the database
    Explain(ExplainArgs),
}

#[derive(Args)]
struct ExplainArgs {
    /// Region path segment, e.g. ganesha
    region: String,
    #[arg(long)]
    filter_category: Option<String>,
    #[arg(long)]
    filter_price: Option<String>,
    #[arg(long)]
    filter_platform: Option<String>,
    #[arg(long)]
    filter_payment: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    sort_status: Option<String>,
    #[arg(long)]
    sort_data: Option<String>,
}

impl ExplainArgs {
    fn raw_params(&self) -> RawSearchParams {
        RawSearchParams {
            filter_category: self.filter_category.clone(),
            filter_price: self.filter_price.clone(),
            filter_platform: self.filter_platform.clone(),
            filter_payment: self.filter_payment.clone(),
            search: self.search.clone(),
            sort_status: self.sort_status.clone(),
            sort_data: self.sort_data.clone(),
        }
    }
}

fn app(database: Arc<Database>) -> impl Endpoint {
    Route::new()
        .at("/api/v1/health", poem::get(api_handlers::health))
        .at("/api/v1/places", poem::post(api_handlers::create_place))
        .at(
            "/api/v1/places/:region",
            poem::get(api_handlers::search_places),
        )
        .at(
            "/api/v1/place/:id",
            poem::get(api_handlers::get_place).delete(api_handlers::delete_place),
        )
        .data(database)
        .with(Cors::new())
        .with(RequestLogging)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve => serve_command().await,
        Commands::Explain(args) => explain_command(&args),
    }
}

async fn serve_command() -> Result<()> {
    let config = ServerConfig::from_env()?;
    let database = Arc::new(Database::new(&config.database_url).await?);
    tracing::info!("Database initialized at {}", config.database_url);

    let addr = config.bind_addr();
    tracing::info!(
        environment = %config.environment,
        "Starting places API server on {}",
        addr
    );

    Server::new(TcpListener::bind(&addr))
        .run(app(database))
        .await
        .context("Server terminated")
}

fn explain_command(args: &ExplainArgs) -> Result<()> {
    let tokens = parse_params(&args.raw_params(), &args.region)?;
    let spec = compile(&tokens);
    let fragment = render_sql(&spec);

    println!("{}", serde_json::to_string_pretty(&spec)?);
    println!();
    println!("WHERE {}", fragment.where_clause);
    println!("{}", fragment.order_clause);
    for (position, value) in fragment.binds.iter().enumerate() {
        println!("  ?{} = {:?}", position + 1, value);
    }
    Ok(())
}
