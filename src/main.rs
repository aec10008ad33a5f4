use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use exhibition_curator::config::Config;
use exhibition_curator::server::{self, AppState};
use exhibition_curator::storage::ExhibitionStore;
use exhibition_curator::types::{ArtworksQuery, FetchParams};
use exhibition_curator::{build_aggregator, logging, metrics};

#[derive(Parser)]
#[command(name = "exhibition_curator")]
#[command(about = "Artwork aggregation service for the Cleveland and Harvard museum APIs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch one combined page of artworks and print it as JSON
    Artworks {
        #[arg(long, default_value = "1")]
        page: String,
        #[arg(long)]
        search: Option<String>,
        /// medium | date
        #[arg(long)]
        sort_by: Option<String>,
        /// asc | desc
        #[arg(long)]
        sort_order: Option<String>,
        /// Comma or pipe separated classification tags
        #[arg(long)]
        classifications: Option<String>,
    },
    /// Fetch a single artwork by id, e.g. cleveland-94979
    Artwork { id: String },
    /// List every classification name
    Classifications,
    /// Manage the local exhibition
    Exhibition {
        #[command(subcommand)]
        action: ExhibitionAction,
    },
}

#[derive(Subcommand)]
enum ExhibitionAction {
    /// Print the stored artworks
    List,
    /// Look up an artwork and add it
    Add { id: String },
    /// Remove an artwork by id
    Remove { id: String },
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    let config = Config::load()?;
    logging::init_logging(&config.log_dir);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(metrics_port) = config.server.metrics_port {
                metrics::init_metrics(metrics_port);
            }
            let aggregator = build_aggregator(&config)?;
            let exhibition = ExhibitionStore::init(&config.exhibition.path)?;
            let port = port.unwrap_or(config.server.port);
            info!(port, "Starting server");
            server::start_server(AppState::new(aggregator, exhibition), port).await?;
        }
        Commands::Artworks {
            page,
            search,
            sort_by,
            sort_order,
            classifications,
        } => {
            let params = FetchParams::from(ArtworksQuery {
                page: Some(page),
                search,
                sort_by,
                sort_order,
                classifications,
            });
            let aggregator = build_aggregator(&config)?;
            print_json(&aggregator.list_artworks(&params).await)?;
        }
        Commands::Artwork { id } => {
            let aggregator = build_aggregator(&config)?;
            print_json(&aggregator.lookup(&id).await?)?;
        }
        Commands::Classifications => {
            let aggregator = build_aggregator(&config)?;
            print_json(&aggregator.classifications().await?)?;
        }
        Commands::Exhibition { action } => {
            let mut store = ExhibitionStore::init(&config.exhibition.path)?;
            match action {
                ExhibitionAction::List => print_json(&store.list())?,
                ExhibitionAction::Add { id } => {
                    let aggregator = build_aggregator(&config)?;
                    let artwork = aggregator.lookup(&id).await?;
                    if store.add(artwork)? {
                        println!("Added {id} to the exhibition");
                    } else {
                        println!("{id} is already in the exhibition");
                    }
                }
                ExhibitionAction::Remove { id } => {
                    if store.remove(&id)? {
                        println!("Removed {id} from the exhibition");
                    } else {
                        println!("{id} is not in the exhibition");
                    }
                }
            }
        }
    }
    Ok(())
}
