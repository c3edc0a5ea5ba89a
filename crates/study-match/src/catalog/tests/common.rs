use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::catalog::domain::{
    CatalogRecord, FilterCriteria, InstitutionType, RecordId, StudyType,
};
use crate::catalog::provider::{CatalogPage, CatalogProvider, CatalogQuery, ProviderError};
use crate::catalog::service::CatalogSearchService;
use crate::config::SearchConfig;
use crate::grading::GradeRequirement;
use crate::intake::Intake;
use crate::pricing::{CurrencyError, CurrencyRateProvider};

pub(super) fn now() -> DateTime<Utc> {
    "2026-03-01T12:00:00Z".parse().expect("valid instant")
}

pub(super) fn intake(name: &str, opens_in_days: i64, closes_in_days: i64) -> Intake {
    Intake {
        name: name.to_string(),
        application_opens: Some(now() + Duration::days(opens_in_days)),
        application_closes: Some(now() + Duration::days(closes_in_days)),
    }
}

pub(super) fn requirement(minimum_score: f64, grade_system: &str) -> GradeRequirement {
    GradeRequirement {
        minimum_score,
        grade_system: grade_system.to_string(),
    }
}

pub(super) fn munich() -> CatalogRecord {
    CatalogRecord {
        id: RecordId("est-001".to_string()),
        name: "Technical University of Munich".to_string(),
        country: "Germany".to_string(),
        city: "Munich".to_string(),
        institution_type: InstitutionType::Public,
        subjects: vec!["Engineering".to_string(), "Computer Science".to_string()],
        study_types: vec![StudyType::Bachelors, StudyType::Masters],
        tuition_display: Some("€170 - €3,770".to_string()),
        grade_requirements: vec![requirement(3.0, "cgpa-4"), requirement(50.0, "percentage")],
        intakes: vec![intake("September 2026", -10, 45)],
    }
}

pub(super) fn lisbon() -> CatalogRecord {
    CatalogRecord {
        id: RecordId("est-002".to_string()),
        name: "Lisbon School of Business".to_string(),
        country: "Portugal".to_string(),
        city: "Lisbon".to_string(),
        institution_type: InstitutionType::Private,
        subjects: vec!["Business".to_string()],
        study_types: vec![StudyType::Masters],
        tuition_display: Some("€12,500".to_string()),
        grade_requirements: vec![requirement(92.0, "percentage")],
        intakes: vec![intake("February 2026", -60, -20), intake("October 2026", 30, 90)],
    }
}

pub(super) fn toronto() -> CatalogRecord {
    CatalogRecord {
        id: RecordId("est-003".to_string()),
        name: "Toronto College of Arts".to_string(),
        country: "Canada".to_string(),
        city: "Toronto".to_string(),
        institution_type: InstitutionType::Private,
        subjects: vec!["Design".to_string()],
        study_types: vec![StudyType::Diploma],
        tuition_display: Some("C$14,000".to_string()),
        grade_requirements: Vec::new(),
        intakes: vec![intake("May 2026", -5, 20)],
    }
}

pub(super) fn sample_records() -> Vec<CatalogRecord> {
    vec![munich(), lisbon(), toronto()]
}

#[derive(Clone)]
pub(super) struct MemoryCatalog {
    records: Arc<Vec<CatalogRecord>>,
    pub(super) fetches: Arc<AtomicUsize>,
}

impl MemoryCatalog {
    pub(super) fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            records: Arc::new(records),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(super) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl CatalogProvider for MemoryCatalog {
    fn fetch_page(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<CatalogPage, ProviderError>> + Send {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let country = query.country.clone();
        let records = self.records.clone();
        async move {
            let records: Vec<CatalogRecord> = records
                .iter()
                .filter(|record| {
                    country
                        .as_deref()
                        .map(|country| record.country.eq_ignore_ascii_case(country))
                        .unwrap_or(true)
                })
                .cloned()
                .collect();
            let total = records.len();
            Ok(CatalogPage { records, total })
        }
    }

    fn fetch_record(
        &self,
        id: &RecordId,
    ) -> impl Future<Output = Result<Option<CatalogRecord>, ProviderError>> + Send {
        let found = self.records.iter().find(|record| record.id == *id).cloned();
        async move { Ok(found) }
    }
}

/// Provider that stalls long enough for a newer search to supersede the
/// in-flight one.
#[derive(Clone)]
pub(super) struct SlowCatalog {
    inner: MemoryCatalog,
    delay_ms: u64,
}

impl SlowCatalog {
    pub(super) fn new(records: Vec<CatalogRecord>, delay_ms: u64) -> Self {
        Self {
            inner: MemoryCatalog::new(records),
            delay_ms,
        }
    }
}

impl CatalogProvider for SlowCatalog {
    fn fetch_page(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<CatalogPage, ProviderError>> + Send {
        let inner = self.inner.clone();
        let query = query.clone();
        let delay_ms = self.delay_ms;
        async move {
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            inner.fetch_page(&query).await
        }
    }

    fn fetch_record(
        &self,
        id: &RecordId,
    ) -> impl Future<Output = Result<Option<CatalogRecord>, ProviderError>> + Send {
        let inner = self.inner.clone();
        let id = id.clone();
        async move { inner.fetch_record(&id).await }
    }
}

pub(super) struct UnavailableCatalog;

impl CatalogProvider for UnavailableCatalog {
    fn fetch_page(
        &self,
        _query: &CatalogQuery,
    ) -> impl Future<Output = Result<CatalogPage, ProviderError>> + Send {
        async { Err(ProviderError::Unavailable("listing service offline".to_string())) }
    }

    fn fetch_record(
        &self,
        _id: &RecordId,
    ) -> impl Future<Output = Result<Option<CatalogRecord>, ProviderError>> + Send {
        async { Err(ProviderError::Unavailable("listing service offline".to_string())) }
    }
}

#[derive(Default, Clone)]
pub(super) struct FixedRates {
    rates: HashMap<(String, String), f64>,
}

impl FixedRates {
    pub(super) fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.rates.insert((from.to_string(), to.to_string()), rate);
        self
    }
}

impl CurrencyRateProvider for FixedRates {
    fn rate(&self, from: &str, to: &str) -> impl Future<Output = Result<f64, CurrencyError>> + Send {
        let found = self.rates.get(&(from.to_string(), to.to_string())).copied();
        let from = from.to_string();
        let to = to.to_string();
        async move { found.ok_or(CurrencyError::UnknownPair { from, to }) }
    }
}

pub(super) fn search_config(debounce_ms: u64) -> SearchConfig {
    SearchConfig {
        debounce_ms,
        page_size: 50,
    }
}

pub(super) fn euro_rates() -> FixedRates {
    FixedRates::default()
        .with_rate("EUR", "USD", 1.1)
        .with_rate("CAD", "USD", 0.75)
}

pub(super) fn build_service(
    records: Vec<CatalogRecord>,
) -> (
    CatalogSearchService<MemoryCatalog, FixedRates>,
    MemoryCatalog,
) {
    let provider = MemoryCatalog::new(records);
    let service = CatalogSearchService::new(
        Arc::new(provider.clone()),
        Arc::new(euro_rates()),
        search_config(0),
    );
    (service, provider)
}

pub(super) fn criteria() -> FilterCriteria {
    FilterCriteria::default()
}
