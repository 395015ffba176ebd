use camper_catalog_common::{CamperType, FeatureKey};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "camper-catalog")]
#[command(about = "Camper rental catalog: normalize API data, browse and keep favorites", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize raw API JSON into the catalog model
    Normalize {
        /// Raw JSON file (list response, array or single record)
        #[arg(required = true)]
        input: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Filter and page through a raw API JSON file
    Catalog {
        /// Raw JSON file
        #[arg(required = true)]
        input: PathBuf,

        /// Location substring
        #[arg(short, long)]
        location: Option<String>,

        /// Body type (van/fully-integrated/alcove/panelTruck)
        #[arg(short = 't', long = "type")]
        camper_type: Option<CamperType>,

        /// Required feature, repeatable (AC, kitchen, TV, ...)
        #[arg(short, long = "feature")]
        features: Vec<FeatureKey>,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Page size (default: config page_limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Only show favorites
        #[arg(long)]
        favorites_only: bool,
    },

    /// Manage the favorites set
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },

    /// Validate a booking request
    Book {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date: String,

        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Show or edit configuration
    Config {
        /// Set the storage directory
        #[arg(long)]
        set_storage_dir: Option<PathBuf>,

        /// Set the write debounce in milliseconds
        #[arg(long)]
        set_debounce_ms: Option<u64>,

        /// Print the configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum FavoritesCommand {
    /// List favorite ids
    List,
    /// Add an id
    Add { id: String },
    /// Remove an id
    Remove { id: String },
    /// Add the id if missing, remove it otherwise
    Toggle { id: String },
    /// Remove every id
    Clear,
}
