use directories::ProjectDirs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/datasets/airport-codes/main/data/airport-codes.csv";
pub const DEFAULT_ARCHIVE_ENTRY: &str = "airport-codes.csv";
pub const DEFAULT_CACHE_KEY: &str = "nomad_airports_cache";
pub const CACHE_VERSION: &str = "1.0";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const BACKGROUND_RETRY_DELAY: Duration = Duration::from_secs(2);
pub const BACKGROUND_FETCH_TIMEOUT: Duration = Duration::from_secs(60);
pub const CACHE_FRESHNESS: Duration = Duration::from_secs(24 * 60 * 60);

pub const ENV_DATASET_URL: &str = "AIRPORT_DATASET_URL";
pub const ENV_CACHE_DIR: &str = "AIRPORT_CACHE_DIR";

/// Everything the dataset repository needs to know about where data comes
/// from and how long it stays good.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Remote origin: plain CSV or a ZIP archive holding `archive_entry`.
    pub url: String,
    pub archive_entry: String,
    pub fetch_timeout: Duration,
    pub background_retry_delay: Duration,
    /// `None` lets the background retry run without a deadline.
    pub background_fetch_timeout: Option<Duration>,
    pub cache_dir: PathBuf,
    pub cache_key: String,
    pub cache_version: String,
    pub cache_freshness: Duration,
    pub essential_fallback: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            url: DEFAULT_DATASET_URL.to_string(),
            archive_entry: DEFAULT_ARCHIVE_ENTRY.to_string(),
            fetch_timeout: FETCH_TIMEOUT,
            background_retry_delay: BACKGROUND_RETRY_DELAY,
            background_fetch_timeout: Some(BACKGROUND_FETCH_TIMEOUT),
            cache_dir: default_cache_dir(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            cache_version: CACHE_VERSION.to_string(),
            cache_freshness: CACHE_FRESHNESS,
            essential_fallback: true,
        }
    }
}

impl DatasetConfig {
    /// Defaults overlaid with `AIRPORT_DATASET_URL` and `AIRPORT_CACHE_DIR`.
    pub fn from_env() -> Self {
        let mut config = DatasetConfig::default();
        if let Ok(url) = std::env::var(ENV_DATASET_URL) {
            if !url.trim().is_empty() {
                config.url = url.trim().to_string();
            }
        }
        if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
            if !dir.trim().is_empty() {
                config.cache_dir = PathBuf::from(dir.trim());
            }
        }
        config
    }

    pub fn cache_file_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", self.cache_key))
    }
}

/// Platform cache directory, or a temp-dir fallback where none exists.
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", "airport-search")
        .map(|proj_dirs| proj_dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("airport-search-cache"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatasetConfig::default();
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_freshness, Duration::from_secs(86_400));
        assert_eq!(config.cache_version, "1.0");
        assert_eq!(config.archive_entry, "airport-codes.csv");
        assert!(config.essential_fallback);
        assert!(config.cache_file_path().ends_with("nomad_airports_cache.json"));
    }
}
