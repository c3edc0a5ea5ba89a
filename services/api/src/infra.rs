use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use study_match::catalog::{
    CatalogPage, CatalogProvider, CatalogQuery, CatalogRecord, InstitutionType, ProviderError,
    RecordId, StudyType,
};
use study_match::grading::GradeRequirement;
use study_match::intake::Intake;
use study_match::pricing::{CurrencyError, CurrencyRateProvider};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog provider backed by an in-memory record set, supporting the
/// server-side simple-field filtering the real listing service offers.
#[derive(Clone)]
pub(crate) struct InMemoryCatalogProvider {
    records: Arc<Vec<CatalogRecord>>,
}

impl InMemoryCatalogProvider {
    pub(crate) fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

impl CatalogProvider for InMemoryCatalogProvider {
    fn fetch_page(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<CatalogPage, ProviderError>> + Send {
        let records = self.records.clone();
        let query = query.clone();
        async move {
            let filtered: Vec<CatalogRecord> = records
                .iter()
                .filter(|record| {
                    query
                        .country
                        .as_deref()
                        .map(|country| record.country.eq_ignore_ascii_case(country))
                        .unwrap_or(true)
                })
                .cloned()
                .collect();

            let total = filtered.len();
            let start = (query.page as usize) * (query.page_size as usize);
            if start > 0 && start >= total {
                return Err(ProviderError::PageOutOfRange);
            }

            let records = filtered
                .into_iter()
                .skip(start)
                .take(query.page_size as usize)
                .collect();
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

/// Fixed-rate table standing in for the external currency service.
#[derive(Clone)]
pub(crate) struct FixedCurrencyRates {
    rates: Arc<HashMap<(String, String), f64>>,
}

impl Default for FixedCurrencyRates {
    fn default() -> Self {
        const RATES: &[(&str, &str, f64)] = &[
            ("EUR", "USD", 1.09),
            ("GBP", "USD", 1.27),
            ("CAD", "USD", 0.74),
            ("JPY", "USD", 0.0066),
            ("USD", "EUR", 0.92),
            ("GBP", "EUR", 1.17),
            ("CAD", "EUR", 0.68),
        ];

        let mut rates = HashMap::with_capacity(RATES.len());
        for (from, to, rate) in RATES {
            rates.insert(((*from).to_string(), (*to).to_string()), *rate);
        }
        Self {
            rates: Arc::new(rates),
        }
    }
}

impl CurrencyRateProvider for FixedCurrencyRates {
    fn rate(&self, from: &str, to: &str) -> impl Future<Output = Result<f64, CurrencyError>> + Send {
        let found = self.rates.get(&(from.to_string(), to.to_string())).copied();
        let from = from.to_string();
        let to = to.to_string();
        async move { found.ok_or(CurrencyError::UnknownPair { from, to }) }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("'{raw}' has no midnight instant"))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn intake(name: &str, opens: &str, closes: &str) -> Intake {
    Intake {
        name: name.to_string(),
        application_opens: parse_date(opens).ok(),
        application_closes: parse_date(closes).ok(),
    }
}

fn requirement(minimum_score: f64, grade_system: &str) -> GradeRequirement {
    GradeRequirement {
        minimum_score,
        grade_system: grade_system.to_string(),
    }
}

/// Seed records used by the demo command and the default `serve` setup.
pub(crate) fn sample_catalog() -> Vec<CatalogRecord> {
    vec![
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
            intakes: vec![
                intake("September 2026", "2026-05-01", "2026-07-15"),
                intake("February 2027", "2026-11-01", "2027-01-15"),
            ],
        },
        CatalogRecord {
            id: RecordId("est-002".to_string()),
            name: "University of Edinburgh".to_string(),
            country: "United Kingdom".to_string(),
            city: "Edinburgh".to_string(),
            institution_type: InstitutionType::Public,
            subjects: vec!["Medicine".to_string(), "Law".to_string()],
            study_types: vec![StudyType::Bachelors, StudyType::Doctorate],
            tuition_display: Some("£9,250 - £26,500".to_string()),
            grade_requirements: vec![requirement(80.0, "percentage")],
            intakes: vec![intake("September 2026", "2026-01-05", "2026-06-30")],
        },
        CatalogRecord {
            id: RecordId("est-003".to_string()),
            name: "Toronto College of Arts".to_string(),
            country: "Canada".to_string(),
            city: "Toronto".to_string(),
            institution_type: InstitutionType::Private,
            subjects: vec!["Design".to_string(), "Media".to_string()],
            study_types: vec![StudyType::Diploma, StudyType::Bachelors],
            tuition_display: Some("C$14,000".to_string()),
            grade_requirements: Vec::new(),
            intakes: vec![intake("May 2026", "2026-02-01", "2026-04-20")],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pagination_respects_page_size() {
        let provider = InMemoryCatalogProvider::new(sample_catalog());
        let page = provider
            .fetch_page(&CatalogQuery {
                page: 0,
                page_size: 2,
                country: None,
            })
            .await
            .expect("page fetch");
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn out_of_range_page_is_rejected() {
        let provider = InMemoryCatalogProvider::new(sample_catalog());
        let result = provider
            .fetch_page(&CatalogQuery {
                page: 5,
                page_size: 2,
                country: None,
            })
            .await;
        assert!(matches!(result, Err(ProviderError::PageOutOfRange)));
    }

    #[test]
    fn parse_date_expects_iso_dates() {
        assert!(parse_date("2026-05-01").is_ok());
        assert!(parse_date("May 1st").is_err());
    }
}
