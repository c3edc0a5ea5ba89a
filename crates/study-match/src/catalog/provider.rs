use super::domain::{CatalogRecord, RecordId};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Page request forwarded to the catalog service. Simple fields may be
/// filtered server-side; derived fields (grade eligibility, intake
/// status, normalized price) are always filtered client-side by this
/// crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub page: u32,
    pub page_size: u32,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub records: Vec<CatalogRecord>,
    pub total: usize,
}

/// Read-only listing service supplying raw establishment/program
/// records. Timeouts and retries are the provider's responsibility.
pub trait CatalogProvider: Send + Sync {
    fn fetch_page(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<CatalogPage, ProviderError>> + Send;

    fn fetch_record(
        &self,
        id: &RecordId,
    ) -> impl Future<Output = Result<Option<CatalogRecord>, ProviderError>> + Send;
}

/// Catalog provider failure.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("catalog service unavailable: {0}")]
    Unavailable(String),
    #[error("catalog page out of range")]
    PageOutOfRange,
}
