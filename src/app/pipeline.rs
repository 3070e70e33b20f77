//! Shared "render pass" logic used by the report, HTML, and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! index fetch -> waste fetch -> collapse failures into empty + diagnostic
//!
//! The front-ends can then focus on presentation (printing vs widgets vs HTML).

use chrono::{DateTime, Utc};

use crate::cache::{CacheKey, CacheStats, Cached, FetchCache};
use crate::config::AppConfig;
use crate::data::{FredClient, IndexSource, WasteClient, WasteSource};
use crate::domain::{IndexPoint, WasteMonthTotal};
use crate::error::{AppError, FetchError};

const OP_INDEX: &str = "fred.series";
const OP_WASTE: &str = "waste.monthly";

/// One series after a render pass: either data, or empty plus a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    /// Human-readable reason the fetch failed; `None` on success.
    pub diagnostic: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> Loaded<T> {
    pub fn ok(items: Vec<T>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            items,
            diagnostic: None,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            diagnostic: Some(diagnostic.into()),
            fetched_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All outputs of a single render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutput {
    pub index: Loaded<IndexPoint>,
    pub waste: Loaded<WasteMonthTotal>,
}

/// Owns the provider clients and the fetch caches for the process lifetime.
pub struct Loader {
    index_source: Box<dyn IndexSource>,
    waste_source: Box<dyn WasteSource>,
    series_id: String,
    index_key: CacheKey,
    waste_key: CacheKey,
    index_cache: FetchCache<Vec<IndexPoint>>,
    waste_cache: FetchCache<Vec<WasteMonthTotal>>,
}

impl Loader {
    /// Build the HTTP-backed loader described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = config
            .http_client()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        let fred = FredClient::new(client.clone(), config);
        let waste = WasteClient::new(client, config);
        Ok(Self::with_sources(Box::new(fred), Box::new(waste), config))
    }

    pub fn with_sources(
        index_source: Box<dyn IndexSource>,
        waste_source: Box<dyn WasteSource>,
        config: &AppConfig,
    ) -> Self {
        let cutoff = config.cutoff.to_string();
        let index_key = CacheKey::new(
            OP_INDEX,
            [config.series_id.clone(), config.fred_base_url.clone(), cutoff.clone()],
        );
        let waste_key = CacheKey::new(
            OP_WASTE,
            [
                config.waste_url.clone(),
                config.waste_limit.to_string(),
                cutoff,
                format!("{:?}", config.null_tonnage),
            ],
        );

        Self {
            index_source,
            waste_source,
            series_id: config.series_id.clone(),
            index_key,
            waste_key,
            index_cache: FetchCache::new(8, config.cache_ttl()),
            waste_cache: FetchCache::new(8, config.cache_ttl()),
        }
    }

    /// Fetch both series (index first), serving from cache where possible.
    ///
    /// Never fails: a fetch error becomes an empty series with a diagnostic.
    pub fn load(&mut self) -> LoadOutput {
        let series_id = self.series_id.clone();
        let index_source = &self.index_source;
        let index = self
            .index_cache
            .get_or_try_insert_with(self.index_key.clone(), || index_source.fetch_index(&series_id));
        let index = collapse(index, |e| {
            format!("Error fetching industrial index data. Check the FRED API key. Details: {e}")
        });

        let waste_source = &self.waste_source;
        let waste = self
            .waste_cache
            .get_or_try_insert_with(self.waste_key.clone(), || waste_source.fetch_waste());
        let waste = collapse(waste, |e| format!("Error fetching waste tonnage data: {e}"));

        LoadOutput { index, waste }
    }

    /// Drop every cached result so the next `load` hits the network.
    pub fn clear_cache(&mut self) {
        tracing::info!("fetch cache cleared");
        self.index_cache.clear();
        self.waste_cache.clear();
    }

    pub fn cache_stats(&self) -> [CacheStats; 2] {
        [self.index_cache.stats(), self.waste_cache.stats()]
    }
}

fn collapse<T, F>(result: Result<Cached<Vec<T>>, FetchError>, describe: F) -> Loaded<T>
where
    F: FnOnce(&FetchError) -> String,
{
    match result {
        Ok(cached) => Loaded::ok(cached.value, cached.fetched_at),
        Err(err) => {
            let message = describe(&err);
            tracing::error!(error = %err, "{message}");
            Loaded::failed(message)
        }
    }
}
