use airport_search_core::{
    AirportRepository, DatasetConfig, DatasetSource, LoadStatus, LogisticsBooking, TravelBooking,
    format_airport_display, value_of,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "airport-search")]
#[command(about = "Search the airport reference dataset and build booking request payloads")]
struct Cli {
    #[command(flatten)]
    dataset: DatasetArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DatasetArgs {
    /// Remote dataset URL (CSV or ZIP archive)
    #[arg(long, global = true, env = "AIRPORT_DATASET_URL")]
    url: Option<String>,
    /// Directory holding the dataset cache
    #[arg(long, global = true, env = "AIRPORT_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
    /// Fail instead of falling back to the built-in essential airports
    #[arg(long, global = true)]
    no_fallback: bool,
    /// Timeout for the dataset download, in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

impl DatasetArgs {
    fn to_config(&self) -> DatasetConfig {
        let mut config = DatasetConfig::from_env();
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        config.essential_fallback = !self.no_fallback;
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search airports by name, city, country, IATA code or ident
    Search {
        query: String,
        /// Show at most this many results
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Show the airport a form value refers to
    Show {
        /// IATA code, ident or name as produced by a selection
        value: String,
    },
    /// Download the dataset now and rewrite the cache
    Refresh,
    /// Show what the cache currently holds
    CacheInfo,
    /// Remove the cached dataset
    ClearCache,
    /// Print the request body for a travel booking email
    TravelPayload {
        #[command(flatten)]
        route: RouteArgs,
        #[arg(long, default_value = "")]
        departure: String,
        #[arg(long = "return", default_value = "")]
        return_date: String,
        #[arg(long, default_value = "1")]
        travelers: String,
        #[arg(long, default_value = "economy")]
        class: String,
        #[arg(long, default_value = "")]
        preferences: String,
    },
    /// Print the request body for a logistics quote email
    LogisticsPayload {
        #[command(flatten)]
        route: RouteArgs,
        #[arg(long, default_value = "")]
        cargo_type: String,
        #[arg(long, default_value = "")]
        weight: String,
        #[arg(long, default_value = "")]
        dimensions: String,
        #[arg(long, default_value = "")]
        value: String,
        #[arg(long, default_value = "")]
        shipping: String,
        #[arg(long, default_value = "")]
        urgency: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Args)]
struct RouteArgs {
    /// Origin airport: a search query or a form value
    #[arg(long)]
    origin: String,
    /// Destination airport: a search query or a form value
    #[arg(long)]
    destination: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

/// Map free text to a form value: an exact value match wins, then the top
/// search result. Unknown text is passed through so manual entry still works.
fn resolve_value<S: DatasetSource>(repository: &AirportRepository<S>, input: &str) -> String {
    if let Some(airport) = repository.find_by_value(input) {
        return value_of(&airport).to_string();
    }
    match repository.search(input).first() {
        Some(airport) => {
            log::info!("Resolved '{}' to {}", input, format_airport_display(airport));
            value_of(airport).to_string()
        }
        None => {
            log::warn!("No airport matches '{}', using it as entered", input);
            input.to_string()
        }
    }
}

/// Booking forms never block on the dataset: a failed load is logged and
/// the typed values are submitted as entered.
async fn load_for_form<S: DatasetSource>(repository: &AirportRepository<S>) {
    if let Err(e) = repository.load().await {
        log::warn!("Airport data unavailable, using values as entered: {}", e);
    }
}

/// Longest a pending background download can keep the process alive.
fn background_wait_bound(config: &DatasetConfig) -> Option<Duration> {
    config
        .background_fetch_timeout
        .map(|timeout| config.background_retry_delay + timeout)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let repository = AirportRepository::new(cli.dataset.to_config())?;

    match cli.command {
        Commands::Search { query, limit } => {
            let airports = repository.load().await?;
            if let LoadStatus::Ready { count, origin } = repository.status() {
                println!("Searching {} airports ({:?})", count, origin);
            }

            let results = airport_search_core::search_airports_with_limit(&query, &airports, limit);
            if results.is_empty() {
                println!("No airports match '{}'", query);
            }
            for (i, airport) in results.iter().enumerate() {
                println!("  {}. {}  [{}]", i + 1, format_airport_display(airport), value_of(airport));
            }
        }
        Commands::Show { value } => {
            repository.load().await?;
            match repository.find_by_value(&value) {
                Some(airport) => {
                    println!("{}", format_airport_display(&airport));
                    println!("{}", serde_json::to_string_pretty(&airport)?);
                }
                None => {
                    eprintln!("No airport has the value '{}'", value);
                    std::process::exit(1);
                }
            }
        }
        Commands::Refresh => match repository.refresh().await {
            Ok(airports) => println!("Loaded {} airports from {}", airports.len(), repository.config().url),
            Err(e) => {
                eprintln!("Refresh failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::CacheInfo => {
            let cache = repository.cache();
            println!("Cache file: {}", cache.cache_path().display());
            match cache.info() {
                Some(info) => {
                    println!("Cached at: {}", info.cached_at);
                    println!("Airports:  {}", info.record_count);
                    println!("Version:   {}", info.version);
                    println!("Valid:     {}", info.is_valid);
                }
                None => println!("No cached dataset"),
            }
        }
        Commands::ClearCache => {
            repository.cache().clear()?;
            println!("Cache cleared");
        }
        Commands::TravelPayload { route, departure, return_date, travelers, class, preferences } => {
            load_for_form(&repository).await;
            let booking = TravelBooking {
                origin: resolve_value(&repository, &route.origin),
                destination: resolve_value(&repository, &route.destination),
                departure,
                return_date,
                travelers,
                class,
                preferences,
                customer_email: Some(route.email),
                customer_name: route.name,
                customer_phone: route.phone,
            };
            println!("POST {}", booking.function_path());
            println!("{}", serde_json::to_string_pretty(&booking.to_request_payload()?)?);
        }
        Commands::LogisticsPayload {
            route,
            cargo_type,
            weight,
            dimensions,
            value,
            shipping,
            urgency,
            description,
        } => {
            load_for_form(&repository).await;
            let booking = LogisticsBooking {
                origin: resolve_value(&repository, &route.origin),
                destination: resolve_value(&repository, &route.destination),
                cargo_type,
                weight,
                dimensions,
                value,
                shipping,
                urgency,
                description,
                customer_email: Some(route.email),
                customer_name: route.name,
                customer_phone: route.phone,
            };
            println!("POST {}", booking.function_path());
            println!("{}", serde_json::to_string_pretty(&booking.to_request_payload()?)?);
        }
    }

    // Let a scheduled background download finish so the cache gets written
    if repository.has_pending_background_refresh() {
        match background_wait_bound(repository.config()) {
            Some(bound) => log::warn!(
                "Waiting up to {}s for background dataset download (Ctrl-C to skip)",
                bound.as_secs()
            ),
            None => log::warn!("Waiting for background dataset download (Ctrl-C to skip)"),
        }
        repository.wait_for_background_refresh().await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use airport_search_core::AirportError;

    struct OfflineSource;

    impl DatasetSource for OfflineSource {
        async fn fetch(&self) -> Result<Vec<u8>, AirportError> {
            Err(AirportError::HttpStatus(503))
        }

        fn describe(&self) -> String {
            "offline".to_string()
        }
    }

    fn offline_config(name: &str) -> DatasetConfig {
        DatasetConfig {
            cache_dir: std::env::temp_dir()
                .join(format!("airport-search-cli-test-{}-{}", std::process::id(), name)),
            essential_fallback: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_payload_built_when_dataset_never_loads() {
        let config = offline_config("payload");
        let repository = AirportRepository::with_source(config.clone(), OfflineSource);

        load_for_form(&repository).await;
        assert!(matches!(repository.status(), LoadStatus::Failed(_)));

        let booking = TravelBooking {
            origin: resolve_value(&repository, "JFK"),
            destination: resolve_value(&repository, "EGKB"),
            customer_email: Some("a@b.c".to_string()),
            ..Default::default()
        };
        let payload = booking.to_request_payload().unwrap();
        assert_eq!(payload["bookingData"]["origin"], "JFK");
        assert_eq!(payload["bookingData"]["destination"], "EGKB");

        std::fs::remove_dir_all(&config.cache_dir).ok();
    }

    #[test]
    fn test_background_wait_bound() {
        let mut config = DatasetConfig::default();
        assert_eq!(
            background_wait_bound(&config),
            Some(config.background_retry_delay + Duration::from_secs(60))
        );
        config.background_fetch_timeout = None;
        assert_eq!(background_wait_bound(&config), None);
    }
}
