use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::domain::{CatalogMatch, CatalogRecord, FilterCriteria, RecordId};
use super::filter::CatalogFilterEngine;
use super::provider::{CatalogProvider, CatalogQuery, ProviderError};
use crate::config::SearchConfig;
use crate::pricing::{self, CurrencyRateProvider, RateSnapshot, DEFAULT_CURRENCY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Orchestrates a filter pass: fetches a catalog page, resolves the
/// currency rates the pass needs, and runs the pure filter engine.
///
/// Rapid interactive input goes through `debounced_search`, which waits
/// for the configured settle time and discards superseded results via a
/// generation counter (last-write-wins).
pub struct CatalogSearchService<P, C> {
    provider: Arc<P>,
    rates: Arc<C>,
    engine: CatalogFilterEngine,
    debounce: Duration,
    page_size: u32,
    generation: AtomicU64,
}

/// Outcome of a filter pass handed to presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub matches: Vec<CatalogMatch>,
    /// Records the provider returned before client-side filtering.
    pub fetched: usize,
}

/// Error raised by the search service. Provider failure is the only
/// fatal condition; currency failures degrade to unconverted display.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl<P, C> CatalogSearchService<P, C>
where
    P: CatalogProvider + 'static,
    C: CurrencyRateProvider + 'static,
{
    pub fn new(provider: Arc<P>, rates: Arc<C>, config: SearchConfig) -> Self {
        Self {
            provider,
            rates,
            engine: CatalogFilterEngine::new(),
            debounce: Duration::from_millis(config.debounce_ms),
            page_size: config.page_size,
            generation: AtomicU64::new(0),
        }
    }

    /// Run one filter pass against the evaluation instant `now`.
    pub async fn search(
        &self,
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
    ) -> Result<SearchResults, SearchError> {
        let query = CatalogQuery {
            page: 0,
            page_size: self.page_size,
            country: match criteria.countries.as_slice() {
                [only] => Some(only.clone()),
                _ => None,
            },
        };

        let page = self.provider.fetch_page(&query).await?;
        let rates = self.rate_snapshot(&page.records, criteria).await;
        let matches = self.engine.filter(&page.records, criteria, now, &rates);

        debug!(
            fetched = page.records.len(),
            matched = matches.len(),
            "filter pass complete"
        );

        Ok(SearchResults {
            matches,
            fetched: page.records.len(),
        })
    }

    /// Settle-then-search for rapid user input. A call superseded by a
    /// newer one (during the settle window or while its fetch is in
    /// flight) resolves to `Ok(None)` and its results are discarded.
    pub async fn debounced_search(
        &self,
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
    ) -> Result<Option<SearchResults>, SearchError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "search superseded before fetch");
            return Ok(None);
        }

        let results = self.search(criteria, now).await?;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "search superseded while in flight");
            return Ok(None);
        }

        Ok(Some(results))
    }

    /// Annotated lookup of a single record for detail views.
    pub async fn find_record(
        &self,
        id: &RecordId,
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
    ) -> Result<Option<CatalogMatch>, SearchError> {
        let Some(record) = self.provider.fetch_record(id).await? else {
            return Ok(None);
        };

        let records = vec![record];
        let rates = self.rate_snapshot(&records, criteria).await;
        let unrestricted = FilterCriteria {
            currency: criteria.currency.clone(),
            ..FilterCriteria::default()
        };

        Ok(self
            .engine
            .filter(&records, &unrestricted, now, &rates)
            .into_iter()
            .next())
    }

    /// Resolve the rates this pass can need, best effort. Failures are
    /// logged and the pair left out of the snapshot; display and fee
    /// checks degrade per policy.
    async fn rate_snapshot(
        &self,
        records: &[CatalogRecord],
        criteria: &FilterCriteria,
    ) -> RateSnapshot {
        let target = criteria.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);

        let mut wanted: BTreeSet<String> = BTreeSet::new();
        for record in records {
            if let Some(display) = record.tuition_display.as_deref() {
                let currency = pricing::parse(display).currency;
                if currency != target {
                    wanted.insert(currency);
                }
            }
        }

        let mut snapshot = RateSnapshot::default();
        for from in wanted {
            match self.rates.rate(&from, target).await {
                Ok(rate) => snapshot.insert(from, target, rate),
                Err(err) => warn!(%from, %target, %err, "rate unavailable, pair left unresolved"),
            }
        }
        snapshot
    }
}
