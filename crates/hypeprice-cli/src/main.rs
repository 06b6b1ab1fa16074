mod render;
mod search;
mod settings;
mod shell;

use clap::{Parser, Subcommand};
use hypeprice_core::{FileStore, SettingsStore, SortOption};
use tracing_subscriber::EnvFilter;

use crate::settings::SettingsCommands;

#[derive(Debug, Parser)]
#[command(name = "hypeprice")]
#[command(about = "Compare retailer prices and landed cost to Taiwan")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search retailers and print one price card per offer
    Search {
        /// Product to search for, e.g. "Barbour Bedale"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Result ordering: recommended, low, or high (persisted)
        #[arg(long)]
        sort: Option<SortOption>,

        /// Only show offers from this retailer; "All Stores" clears it (persisted)
        #[arg(long)]
        store: Option<String>,

        /// Print the display list as JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Inspect or change persisted cost and view settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Landed-cost breakdown for a base price under the current settings
    Quote {
        /// Base price already converted to TWD
        price_twd: f64,
    },
    /// Interactive session: each line is a search or a settings edit
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = hypeprice_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");
    let mut store = SettingsStore::new(FileStore::new(&config.settings_path));

    match cli.command {
        Some(Commands::Search {
            query,
            sort,
            store: store_name,
            json,
        }) => {
            let options = search::SearchOptions {
                query: query.join(" "),
                sort,
                store: store_name,
                json,
            };
            search::run_search_command(&config, &mut store, options).await
        }
        Some(Commands::Settings { command }) => {
            settings::run_settings_command(&mut store, command);
            Ok(())
        }
        Some(Commands::Quote { price_twd }) => {
            let model = store.load().cost_model;
            print!("{}", render::render_quote(price_twd, &model));
            Ok(())
        }
        Some(Commands::Shell) => shell::run_shell(&config, &mut store).await,
        None => {
            println!("hypeprice: try `hypeprice search <QUERY>` or `hypeprice --help`");
            Ok(())
        }
    }
}
