use crate::airport::AirportRecord;
use crate::config::DatasetConfig;
use crate::error::AirportError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Versioned, timestamped snapshot of the dataset as persisted on disk.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CacheEnvelope {
    pub data: Vec<AirportRecord>,
    /// Creation instant, epoch milliseconds.
    pub timestamp: i64,
    pub version: String,
}

/// Summary of what the cache slot currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub cached_at: OffsetDateTime,
    pub record_count: usize,
    pub version: String,
    pub is_valid: bool,
}

pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

impl CacheEnvelope {
    pub fn new(data: Vec<AirportRecord>, version: &str) -> Self {
        CacheEnvelope {
            data,
            timestamp: now_millis(),
            version: version.to_string(),
        }
    }

    pub fn age(&self, now_ms: i64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.timestamp).max(0) as u64)
    }

    /// Reusable only with the expected version, inside the freshness window,
    /// and with at least one record.
    pub fn is_valid(&self, expected_version: &str, freshness: Duration, now_ms: i64) -> bool {
        self.version == expected_version && self.age(now_ms) < freshness && !self.data.is_empty()
    }

    pub fn cached_at(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp_nanos(self.timestamp as i128 * 1_000_000)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// Durable slot holding one [`CacheEnvelope`] as a JSON file.
#[derive(Debug, Clone)]
pub struct AirportCache {
    cache_file_path: PathBuf,
    version: String,
    freshness: Duration,
}

impl AirportCache {
    pub fn new(config: &DatasetConfig) -> Self {
        AirportCache {
            cache_file_path: config.cache_file_path(),
            version: config.cache_version.clone(),
            freshness: config.cache_freshness,
        }
    }

    /// Records from the slot if the envelope is valid. Unreadable, corrupt,
    /// stale or mismatched envelopes are all reported as a miss.
    pub fn load_valid(&self) -> Option<Vec<AirportRecord>> {
        let cached = match self.load_envelope() {
            Ok(cached) => cached,
            Err(e) => {
                debug!(error = %e, "No usable airports cache");
                return None;
            }
        };

        let now = now_millis();
        if cached.version != self.version {
            warn!(
                found = %cached.version,
                expected = %self.version,
                "Airports cache version mismatch"
            );
            return None;
        }
        if !cached.is_valid(&self.version, self.freshness, now) {
            info!(
                age_hours = cached.age(now).as_secs() / 3600,
                record_count = cached.data.len(),
                "Airports cache expired or empty"
            );
            return None;
        }

        info!(
            age_minutes = cached.age(now).as_secs() / 60,
            record_count = cached.data.len(),
            "CACHE HIT: using cached airports"
        );
        Some(cached.data)
    }

    pub fn load_envelope(&self) -> Result<CacheEnvelope, AirportError> {
        if !self.cache_file_path.exists() {
            return Err(AirportError::Cache("Airports cache file not found".to_string()));
        }

        let content = fs::read_to_string(&self.cache_file_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overwrite the slot with a fresh envelope around `airports`.
    pub fn save(&self, airports: &[AirportRecord]) -> Result<(), AirportError> {
        if let Some(parent) = self.cache_file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let envelope = CacheEnvelope::new(airports.to_vec(), &self.version);
        self.write_envelope(&envelope)?;

        info!(
            record_count = airports.len(),
            cache_file = %self.cache_file_path.display(),
            "Saved airports to cache"
        );
        Ok(())
    }

    pub fn write_envelope(&self, envelope: &CacheEnvelope) -> Result<(), AirportError> {
        let content = serde_json::to_string_pretty(envelope)?;
        fs::write(&self.cache_file_path, content)?;
        Ok(())
    }

    pub fn info(&self) -> Option<CacheInfo> {
        self.load_envelope().ok().map(|cached| CacheInfo {
            cached_at: cached.cached_at(),
            record_count: cached.data.len(),
            is_valid: cached.is_valid(&self.version, self.freshness, now_millis()),
            version: cached.version,
        })
    }

    pub fn clear(&self) -> Result<(), AirportError> {
        if self.cache_file_path.exists() {
            fs::remove_file(&self.cache_file_path)?;
        }
        Ok(())
    }

    pub fn cache_path(&self) -> &PathBuf {
        &self.cache_file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::essential::essential_airports;
    use std::env;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    fn test_config(name: &str) -> DatasetConfig {
        DatasetConfig {
            cache_dir: env::temp_dir()
                .join(format!("airport-search-cache-test-{}-{}", std::process::id(), name)),
            ..Default::default()
        }
    }

    fn cleanup(config: &DatasetConfig) {
        fs::remove_dir_all(&config.cache_dir).ok();
    }

    #[test]
    fn test_save_then_load() {
        let config = test_config("save-load");
        let cache = AirportCache::new(&config);
        assert!(cache.load_valid().is_none());

        cache.save(&essential_airports()).unwrap();
        let loaded = cache.load_valid().unwrap();
        assert_eq!(loaded, essential_airports());

        let info = cache.info().unwrap();
        assert_eq!(info.record_count, 8);
        assert_eq!(info.version, "1.0");
        assert!(info.is_valid);

        cleanup(&config);
    }

    #[test]
    fn test_envelope_json_shape() {
        let config = test_config("json-shape");
        let cache = AirportCache::new(&config);
        cache.save(&essential_airports()).unwrap();

        let raw = fs::read_to_string(cache.cache_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["data"].is_array());
        assert!(value["timestamp"].is_i64());
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["data"][0]["type"], "large_airport");

        cleanup(&config);
    }

    #[test]
    fn test_expired_envelope_is_a_miss() {
        let config = test_config("expired");
        let cache = AirportCache::new(&config);
        fs::create_dir_all(&config.cache_dir).unwrap();

        let mut envelope = CacheEnvelope::new(essential_airports(), "1.0");
        envelope.timestamp = now_millis() - DAY_MS - 1;
        cache.write_envelope(&envelope).unwrap();

        assert!(cache.load_valid().is_none());
        assert!(!cache.info().unwrap().is_valid);

        cleanup(&config);
    }

    #[test]
    fn test_version_mismatch_and_empty_are_misses() {
        let config = test_config("version");
        let cache = AirportCache::new(&config);
        fs::create_dir_all(&config.cache_dir).unwrap();

        cache
            .write_envelope(&CacheEnvelope::new(essential_airports(), "0.9"))
            .unwrap();
        assert!(cache.load_valid().is_none());

        cache.write_envelope(&CacheEnvelope::new(Vec::new(), "1.0")).unwrap();
        assert!(cache.load_valid().is_none());

        cleanup(&config);
    }

    #[test]
    fn test_corrupt_file_is_a_miss() {
        let config = test_config("corrupt");
        let cache = AirportCache::new(&config);
        fs::create_dir_all(&config.cache_dir).unwrap();
        fs::write(cache.cache_path(), "{not json").unwrap();

        assert!(cache.load_valid().is_none());
        assert!(cache.info().is_none());
        match cache.load_envelope() {
            Err(AirportError::Json(_)) => {}
            other => panic!("Expected Json error, got {:?}", other),
        }

        cache.clear().unwrap();
        assert!(!cache.cache_path().exists());
        // Clearing an absent slot is fine
        cache.clear().unwrap();

        cleanup(&config);
    }

    #[test]
    fn test_unwritable_slot_reports_io_error() {
        let config = test_config("unwritable");
        fs::create_dir_all(&config.cache_dir).unwrap();
        let cache = AirportCache::new(&config);
        // A directory where the file should be
        fs::create_dir_all(cache.cache_path()).unwrap();

        match cache.save(&essential_airports()) {
            Err(AirportError::Io(_)) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
        assert!(matches!(cache.load_envelope(), Err(AirportError::Io(_))));

        cleanup(&config);
    }

    #[test]
    fn test_validity_window() {
        let envelope = CacheEnvelope {
            data: essential_airports(),
            timestamp: 1_000,
            version: "1.0".to_string(),
        };
        let day = Duration::from_secs(86_400);

        assert!(envelope.is_valid("1.0", day, 1_000 + DAY_MS - 1));
        assert!(!envelope.is_valid("1.0", day, 1_000 + DAY_MS));
        assert!(!envelope.is_valid("2.0", day, 1_000));
    }
}
