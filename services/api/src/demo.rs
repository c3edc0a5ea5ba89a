use crate::infra::{parse_date, sample_catalog, FixedCurrencyRates, InMemoryCatalogProvider};
use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use study_match::catalog::{
    CatalogFeedImporter, CatalogMatch, CatalogRecord, CatalogSearchService, FilterCriteria,
    SearchResults, StudyType,
};
use study_match::config::SearchConfig;
use study_match::error::AppError;
use study_match::grading::{Grade, GradeConversionEngine};

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Restrict matches to one or more countries
    #[arg(long)]
    pub(crate) country: Vec<String>,
    /// Restrict matches to one or more subjects
    #[arg(long)]
    pub(crate) subject: Vec<String>,
    /// Free-text search over name, country, and city
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Candidate grade value, paired with --grade-system
    #[arg(long, requires = "grade_system")]
    pub(crate) grade: Option<f64>,
    /// Grading scale the candidate grade is expressed in
    #[arg(long)]
    pub(crate) grade_system: Option<String>,
    /// Upper tuition bound in --currency
    #[arg(long)]
    pub(crate) max_fees: Option<f64>,
    /// Currency for fee bounds and displayed tuition (default USD)
    #[arg(long)]
    pub(crate) currency: Option<String>,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<DateTime<Utc>>,
    /// Load records from a catalog feed CSV instead of the sample set
    #[arg(long)]
    pub(crate) feed: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<DateTime<Utc>>,
    /// Optional catalog feed CSV to hydrate the demo catalog
    #[arg(long)]
    pub(crate) feed: Option<PathBuf>,
}

fn load_catalog(feed: Option<PathBuf>) -> Result<Vec<CatalogRecord>, AppError> {
    match feed {
        Some(path) => Ok(CatalogFeedImporter::from_path(path)?),
        None => Ok(sample_catalog()),
    }
}

fn build_service(
    records: Vec<CatalogRecord>,
    debounce_ms: u64,
) -> CatalogSearchService<InMemoryCatalogProvider, FixedCurrencyRates> {
    CatalogSearchService::new(
        Arc::new(InMemoryCatalogProvider::new(records)),
        Arc::new(FixedCurrencyRates::default()),
        SearchConfig {
            debounce_ms,
            page_size: SearchConfig::DEFAULT_PAGE_SIZE,
        },
    )
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        country,
        subject,
        search,
        grade,
        grade_system,
        max_fees,
        currency,
        today,
        feed,
    } = args;

    let criteria = FilterCriteria {
        search,
        countries: country,
        subjects: subject,
        grade: match (grade, grade_system) {
            (Some(value), Some(system)) => Some(Grade::new(value, system)),
            _ => None,
        },
        max_fees,
        currency,
        ..FilterCriteria::default()
    };

    let now = today.unwrap_or_else(Utc::now);
    let service = build_service(load_catalog(feed)?, 0);
    let results = match service.search(&criteria, now).await {
        Ok(results) => results,
        Err(err) => {
            println!("Catalog unavailable: {err}");
            return Ok(());
        }
    };

    render_results(&results, now);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, feed } = args;
    let now = today.unwrap_or_else(Utc::now);

    println!("Grade conversion demo");
    let engine = GradeConversionEngine::new();
    let percentage = Grade::new(85.5, "percentage");
    println!(
        "- 85.5% normalizes to {:.2} on the common scale",
        engine.normalize(&percentage)
    );
    println!(
        "- 85.5% converts to {:.2} on the 4.0 scale",
        engine.convert(&percentage, "cgpa-4")
    );
    println!(
        "- 16/20 converts to {:.1}% ",
        engine.convert(&Grade::new(16.0, "cgpa-20"), "percentage")
    );

    println!("\nCatalog search demo (evaluated {})", now.format("%Y-%m-%d"));
    let criteria = FilterCriteria {
        grade: Some(Grade::new(3.5, "cgpa-4")),
        study_types: vec![StudyType::Bachelors],
        currency: Some("USD".to_string()),
        ..FilterCriteria::default()
    };
    println!("Criteria: bachelors programs, candidate grade 3.5/4.0, fees shown in USD");

    let service = build_service(load_catalog(feed)?, 150);

    // Two rapid-fire searches: the first settles out, only the second
    // reaches the catalog (last-write-wins).
    let (stale, latest) = tokio::join!(
        service.debounced_search(&criteria, now),
        async {
            tokio::time::sleep(std::time::Duration::from_millis(40)).await;
            service.debounced_search(&criteria, now).await
        }
    );

    match stale {
        Ok(None) => println!("First keystroke superseded before fetch (discarded)"),
        Ok(Some(_)) => println!("First keystroke settled unexpectedly"),
        Err(err) => println!("First keystroke failed: {err}"),
    }

    match latest {
        Ok(Some(results)) => render_results(&results, now),
        Ok(None) => println!("Latest search superseded"),
        Err(err) => println!("Catalog unavailable: {err}"),
    }

    Ok(())
}

fn render_results(results: &SearchResults, now: DateTime<Utc>) {
    println!(
        "\n{} of {} fetched records match (evaluated {})",
        results.matches.len(),
        results.fetched,
        now.format("%Y-%m-%d")
    );

    for matched in &results.matches {
        render_match(matched);
    }
}

fn render_match(matched: &CatalogMatch) {
    let CatalogMatch {
        record,
        intake,
        next_intake,
        tuition,
    } = matched;

    println!(
        "- {} ({}, {}) [{}]",
        record.name,
        record.city,
        record.country,
        record.institution_type.label()
    );
    println!("    intake: {} ({})", intake.status.label(), intake.text);
    if let Some(name) = next_intake {
        println!("    next window: {name}");
    }
    if let Some(tuition) = tuition {
        println!("    tuition: {tuition}");
    }
}
