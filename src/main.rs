use camper_catalog::{cli, config, error, logging, storage, FavoritesSession, SessionOptions};
use camper_catalog_common::catalog::{available_features, format_price};
use camper_catalog_common::{filter_campers, parse_list_json, BookingPayload, Filters, Pagination};
use clap::Parser;
use cli::{Cli, Commands, FavoritesCommand};
use config::Config;
use error::{CatalogError, Result};
use std::path::Path;
use storage::{FileStorage, SharedStorage};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    let mut config = Config::load()?;

    match cli.command {
        Commands::Normalize { input, output } => {
            let page = parse_list_json(&read_input(&input)?)?;
            debug!(total = page.total, items = page.items.len(), "normalized");

            let json = serde_json::to_string_pretty(&page)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("✔ {} campers written to {}", page.items.len(), path.display());
                }
                None => println!("{json}"),
            }
        }

        Commands::Catalog { input, location, camper_type, features, page, limit, favorites_only } => {
            let list = parse_list_json(&read_input(&input)?)?;
            let filters = Filters { location, camper_type, features };
            let favorites = open_session(&config)?;

            let matched: Vec<_> = filter_campers(&list.items, &filters)
                .into_iter()
                .filter(|c| !favorites_only || favorites.store().is_favorite(&c.id))
                .collect();

            // Walk "load more" up to the requested page
            let mut pagination = Pagination::new(limit.unwrap_or(config.page_limit));
            let limit = pagination.limit;
            let page_len = |page: usize| matched.iter().skip((page - 1) * limit).take(limit).count();
            pagination.begin();
            pagination.first_page_loaded(page_len(1));
            while pagination.page < page && pagination.has_more {
                let next = pagination.next_page();
                pagination.begin();
                pagination.next_page_loaded(page_len(next));
            }

            let start = (pagination.page - 1) * pagination.limit;
            let shown: Vec<_> = matched.iter().skip(start).take(pagination.limit).collect();

            println!("{} of {} campers match (page {})\n", matched.len(), list.items.len(), pagination.page);
            for camper in &shown {
                let mark = if favorites.store().is_favorite(&camper.id) { "♥" } else { " " };
                println!("{mark} [{}] {}  {}", camper.id, camper.name, format_price(camper.price));
                println!("    {} · ★ {} ({} reviews)", camper.location, camper.rating, camper.reviews.len());
                let features = available_features(camper);
                if !features.is_empty() {
                    println!("    {}", features.join(", "));
                }
            }
            if pagination.has_more && start + shown.len() < matched.len() {
                println!("\nMore: --page {}", pagination.next_page());
            }

            favorites.shutdown().await;
        }

        Commands::Favorites { action } => {
            let favorites = open_session(&config)?;

            let changed = match &action {
                FavoritesCommand::List => false,
                FavoritesCommand::Add { id } => favorites.add(id.as_str()),
                FavoritesCommand::Remove { id } => favorites.remove(id.as_str()),
                FavoritesCommand::Toggle { id } => favorites.toggle(id.as_str()),
                FavoritesCommand::Clear => favorites.clear(),
            };

            let ids = favorites.store().ids();
            favorites.shutdown().await;

            if action != FavoritesCommand::List && !changed {
                println!("(no change)");
            }
            if ids.is_empty() {
                println!("No favorites");
            } else {
                println!("♥ {} favorites", ids.len());
                for id in ids {
                    println!("  {id}");
                }
            }
        }

        Commands::Book { name, email, date, comment } => {
            let payload = BookingPayload { name, email, booking_date: date, comment };
            let today = chrono::Local::now().date_naive();

            payload.ensure_valid(today)?;
            println!("✔ Booking request is valid");
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }

        Commands::Config { set_storage_dir, set_debounce_ms, show } => {
            let mut modified = false;

            if let Some(dir) = set_storage_dir {
                config.storage_dir = Some(dir);
                modified = true;
                println!("✔ Storage directory updated");
            }

            if let Some(ms) = set_debounce_ms {
                config.debounce_ms = ms;
                modified = true;
                println!("✔ Debounce set to {ms}ms");
            }

            if modified {
                config.save()?;
            }

            if show || !modified {
                println!("Config file: {}", Config::config_path()?.display());
                println!("Storage directory: {}", config.storage_dir()?.display());
                println!("Debounce: {}ms", config.debounce_ms);
                println!("Page limit: {}", config.page_limit);
                println!("API base URL: {}", config.api_base_url);
            }
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CatalogError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn open_session(config: &Config) -> Result<FavoritesSession> {
    let dir = config.storage_dir()?;
    std::fs::create_dir_all(&dir)?;
    debug!(dir = %dir.display(), "opening favorites storage");

    let storage = SharedStorage::new(FileStorage::new(dir)).connect();
    let options = SessionOptions {
        debounce: config.debounce(),
        ..Default::default()
    };
    Ok(FavoritesSession::boot(storage, options))
}
