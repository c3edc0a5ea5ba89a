//! Catalog filtering: composes grade eligibility, intake state, and
//! price normalization over externally supplied records.

pub mod domain;
pub mod feed;
pub mod filter;
pub mod provider;
pub mod router;
pub mod service;

mod normalizer;

#[cfg(test)]
mod tests;

pub use domain::{
    CatalogMatch, CatalogRecord, FilterCriteria, InstitutionType, RecordId, StudyType,
};
pub use feed::{CatalogFeedError, CatalogFeedImporter};
pub use filter::CatalogFilterEngine;
pub use provider::{CatalogPage, CatalogProvider, CatalogQuery, ProviderError};
pub use router::catalog_router;
pub use service::{CatalogSearchService, SearchError, SearchResults};
