//! RentNest CLI - a command-line client for the RentNest rental marketplace.
//!
//! Wires the durable cache, the state store, and the API client together and
//! exposes the main browse/search/auth flows as subcommands.

use std::io;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rentnest::api::ApiClient;
use rentnest::cache::{CacheManager, ViewTracker};
use rentnest::config::Config;
use rentnest::models::Property;
use rentnest::storage::{FileStorage, StoragePort};
use rentnest::store::Store;
use rentnest::sync::{hydrate_store, Coordinator};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

const USAGE: &str = "\
Usage: rentnest <command> [args]

Commands:
  home                Show trending locations and the most viewed listings
  top                 Show the most viewed listings
  popular             Show popular locations
  search <location>   Search listings by location
  view <id>           Show a listing and record the visit
  login <email>       Log in (password prompted)
  signup <name> <email>  Register a new account (password prompted)
  logout              Clear the saved session
  profile             Show the signed-in user's profile
";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        eprint!("{}", USAGE);
        std::process::exit(2);
    };

    let mut config = Config::load()?;
    let data_dir = config.data_dir()?;
    let storage: Arc<dyn StoragePort> = Arc::new(FileStorage::new(data_dir)?);

    let cache = CacheManager::new(Arc::clone(&storage));
    let tracker = ViewTracker::new(storage);
    let store = Arc::new(Store::new());
    hydrate_store(&store, &cache);

    let api = ApiClient::new(config.base_url())?;
    let coordinator = Coordinator::new(api, Arc::clone(&store), cache, tracker);

    info!(%command, "RentNest CLI starting");

    match command.as_str() {
        "home" => {
            let trending = coordinator.load_home(false).await?;
            println!("Trending: {}", trending.join(", "));
            print_listings(&store.property().top_properties);
        }
        "top" => {
            coordinator.load_top_properties(false).await?;
            print_listings(&store.property().top_properties);
        }
        "popular" => {
            let locations = coordinator.popular_locations(false).await?;
            for location in locations {
                println!("{}", location);
            }
        }
        "search" => {
            let Some(location) = args.get(2) else {
                bail!("Usage: rentnest search <location>");
            };
            coordinator
                .search(&rentnest::api::SearchFilter::location(location), false)
                .await?;
            print_listings(&store.property().searched_properties);
        }
        "view" => {
            let Some(id) = args.get(2) else {
                bail!("Usage: rentnest view <id>");
            };
            let property = coordinator.api().fetch_property(id).await?;
            println!("{}", property.summary());
            if let Some(description) = &property.description {
                println!("{}", description);
            }
            if coordinator.record_view(id).await? {
                info!(%id, "View recorded");
            }
        }
        "login" => {
            let Some(email) = args.get(2) else {
                bail!("Usage: rentnest login <email>");
            };
            let password = rpassword::prompt_password("Password: ")?;
            coordinator.login(email, &password).await?;
            config.last_email = Some(email.clone());
            config.save()?;
            println!("Logged in as {}", email);
        }
        "signup" => {
            let (Some(name), Some(email)) = (args.get(2), args.get(3)) else {
                bail!("Usage: rentnest signup <name> <email>");
            };
            let password = rpassword::prompt_password("Password: ")?;
            let message = coordinator.api().signup(name, email, &password).await?;
            println!("{}", message);
        }
        "logout" => {
            coordinator.logout();
            println!("Logged out");
        }
        "profile" => {
            let profile = coordinator.profile(false).await?;
            println!("{} <{}>", profile.name, profile.email);
        }
        other => {
            eprintln!("Unknown command: {}\n", other);
            eprint!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn print_listings(listings: &[Property]) {
    if listings.is_empty() {
        println!("No listings found.");
        return;
    }
    for property in listings {
        println!("{}", property.summary());
    }
}
