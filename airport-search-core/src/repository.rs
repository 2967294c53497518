//! Process-lifetime owner of the airport list.
//!
//! The list is produced at most once per repository (cache, then remote,
//! then the essential set) and afterwards only ever replaced wholesale, by a
//! background retry or an explicit [`AirportRepository::refresh`]. Readers
//! take an `Arc` snapshot and never observe a partially built list.

use crate::airport::AirportRecord;
use crate::cache::AirportCache;
use crate::config::DatasetConfig;
use crate::error::AirportError;
use crate::essential::essential_airports;
use crate::parser::parse_airports;
use crate::search::{find_by_value, search_airports};
use crate::source::{DatasetSource, HttpSource, decode_dataset};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub type AirportSnapshot = Arc<Vec<AirportRecord>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrigin {
    Cache,
    Remote,
    Essential,
    BackgroundRefresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    NotStarted,
    Loading,
    Ready { count: usize, origin: DatasetOrigin },
    Failed(String),
}

struct Shared<S> {
    source: S,
    config: DatasetConfig,
    cache: AirportCache,
    airports: RwLock<Option<AirportSnapshot>>,
    status: RwLock<LoadStatus>,
    /// Single-flight guard for acquisitions; holds the message of the last
    /// failed load so callers queued behind it get the same outcome.
    load_lock: tokio::sync::Mutex<Option<String>>,
    failed_loads: AtomicU64,
    background: Mutex<Option<JoinHandle<()>>>,
}

/// Cloneable handle to one airport dataset. Clones share state.
pub struct AirportRepository<S: DatasetSource = HttpSource> {
    inner: Arc<Shared<S>>,
}

impl<S: DatasetSource> Clone for AirportRepository<S> {
    fn clone(&self) -> Self {
        AirportRepository {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AirportRepository<HttpSource> {
    /// Repository fetching from `config.url` over HTTP.
    pub fn new(config: DatasetConfig) -> Result<Self, AirportError> {
        let source = HttpSource::new(&config.url)?;
        Ok(Self::with_source(config, source))
    }
}

impl<S: DatasetSource> AirportRepository<S> {
    pub fn with_source(config: DatasetConfig, source: S) -> Self {
        let cache = AirportCache::new(&config);
        AirportRepository {
            inner: Arc::new(Shared {
                source,
                config,
                cache,
                airports: RwLock::new(None),
                status: RwLock::new(LoadStatus::NotStarted),
                load_lock: tokio::sync::Mutex::new(None),
                failed_loads: AtomicU64::new(0),
                background: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &AirportCache {
        &self.inner.cache
    }

    /// Current list, without loading anything.
    pub fn snapshot(&self) -> Option<AirportSnapshot> {
        let airports = self
            .inner
            .airports
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        airports.clone()
    }

    pub fn status(&self) -> LoadStatus {
        self.inner
            .status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Produce the airport list, acquiring it on first use.
    ///
    /// Order: in-memory list, in-flight acquisition, valid cache, remote
    /// fetch, essential set. Remote failures fall back to the essential set
    /// (when enabled) and schedule one background retry.
    pub async fn load(&self) -> Result<AirportSnapshot, AirportError> {
        if let Some(airports) = self.snapshot() {
            return Ok(airports);
        }

        let observed_failures = self.inner.failed_loads.load(Ordering::SeqCst);
        let mut last_failure = self.inner.load_lock.lock().await;

        // Another caller finished an acquisition while we waited
        if let Some(airports) = self.snapshot() {
            debug!("Airport list became available while waiting");
            return Ok(airports);
        }
        if self.inner.failed_loads.load(Ordering::SeqCst) != observed_failures {
            let message = last_failure.clone().unwrap_or_default();
            return Err(AirportError::Unavailable(message));
        }

        self.set_status(LoadStatus::Loading);

        if let Some(cached) = self.inner.cache.load_valid() {
            return Ok(self.install(cached, DatasetOrigin::Cache));
        }

        info!(source = %self.inner.source.describe(), "CACHE MISS: fetching airport dataset");
        match self.fetch_remote(Some(self.inner.config.fetch_timeout)).await {
            Ok(airports) => {
                self.persist(&airports);
                Ok(self.install(airports, DatasetOrigin::Remote))
            }
            Err(e) if self.inner.config.essential_fallback => {
                warn!(error = %e, "Failed to load full airport dataset, using essential airports");
                let snapshot = self.install(essential_airports(), DatasetOrigin::Essential);
                self.schedule_background_refresh();
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load airport dataset and no fallback is configured");
                *last_failure = Some(e.to_string());
                self.inner.failed_loads.fetch_add(1, Ordering::SeqCst);
                self.set_status(LoadStatus::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Fetch the remote dataset now, bypassing the cache, and swap it in.
    /// On failure the current list is left untouched.
    pub async fn refresh(&self) -> Result<AirportSnapshot, AirportError> {
        let _guard = self.inner.load_lock.lock().await;
        info!(source = %self.inner.source.describe(), "Force refreshing airport dataset");

        let airports = self
            .fetch_remote(Some(self.inner.config.fetch_timeout))
            .await?;
        self.persist(&airports);
        Ok(self.install(airports, DatasetOrigin::Remote))
    }

    /// A list usable right away without network: valid cache, else the
    /// essential set.
    pub fn immediate(&self) -> Vec<AirportRecord> {
        self.inner
            .cache
            .load_valid()
            .unwrap_or_else(essential_airports)
    }

    /// Search the list as it is at call time; empty while nothing is loaded.
    pub fn search(&self, query: &str) -> Vec<AirportRecord> {
        match self.snapshot() {
            Some(airports) => search_airports(query, &airports),
            None => Vec::new(),
        }
    }

    pub fn find_by_value(&self, value: &str) -> Option<AirportRecord> {
        let airports = self.snapshot()?;
        find_by_value(value, &airports).cloned()
    }

    /// Wait for the pending background retry, if one was scheduled.
    pub async fn wait_for_background_refresh(&self) {
        let handle = self
            .inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Background airport refresh task did not complete");
            }
        }
    }

    pub fn has_pending_background_refresh(&self) -> bool {
        self.inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    async fn fetch_remote(&self, timeout: Option<Duration>) -> Result<Vec<AirportRecord>, AirportError> {
        let start = Instant::now();
        let fetch = self.inner.source.fetch();
        let bytes = match timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| AirportError::Timeout(limit))??,
            None => fetch.await?,
        };

        let text = decode_dataset(&bytes, &self.inner.config.archive_entry)?;
        let airports = parse_airports(&text);
        if airports.is_empty() {
            return Err(AirportError::EmptyDataset);
        }

        info!(
            bytes = bytes.len(),
            record_count = airports.len(),
            duration_ms = start.elapsed().as_millis(),
            "Fetched airport dataset"
        );
        Ok(airports)
    }

    fn persist(&self, airports: &[AirportRecord]) {
        if let Err(e) = self.inner.cache.save(airports) {
            warn!(error = %e, "Failed to save airports to cache");
        }
    }

    fn install(&self, airports: Vec<AirportRecord>, origin: DatasetOrigin) -> AirportSnapshot {
        let count = airports.len();
        let snapshot = Arc::new(airports);
        {
            let mut current = self
                .inner
                .airports
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *current = Some(Arc::clone(&snapshot));
        }
        self.set_status(LoadStatus::Ready { count, origin });
        info!(record_count = count, origin = ?origin, "Airport list installed");
        snapshot
    }

    fn set_status(&self, status: LoadStatus) {
        let mut current = self
            .inner
            .status
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = status;
    }

    /// Detached retry of the remote fetch. Its only effect is replacing the
    /// essential list on success; failures are logged and not retried again.
    /// A list installed meanwhile (by `refresh`) is left in place.
    fn schedule_background_refresh(&self) {
        let repository = self.clone();
        let delay = self.inner.config.background_retry_delay;
        info!(delay_ms = delay.as_millis(), "Scheduling background airport refresh");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let timeout = repository.inner.config.background_fetch_timeout;
            match repository.fetch_remote(timeout).await {
                Ok(airports) => {
                    let _guard = repository.inner.load_lock.lock().await;
                    match repository.status() {
                        LoadStatus::Ready { origin: DatasetOrigin::Essential, .. } => {
                            repository.persist(&airports);
                            repository.install(airports, DatasetOrigin::BackgroundRefresh);
                            info!("Full airport dataset loaded in background");
                        }
                        status => {
                            debug!(status = ?status, "Airport list replaced meanwhile, dropping background result");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Background loading of airport dataset failed");
                }
            }
        });

        let mut background = self
            .inner
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *background = Some(handle);
    }
}
