use super::domain::{CatalogMatch, CatalogRecord, FilterCriteria};
use super::normalizer::contains_normalized;
use crate::grading::{GradeConversionEngine, RequirementMatcher};
use crate::intake::{no_dates_view, select_next_intake, status_at};
use crate::pricing::{self, RateSnapshot, DEFAULT_CURRENCY};
use chrono::{DateTime, Utc};

/// Pure reducer from raw records to the subset matching every active
/// criterion, each annotated with intake state and display tuition.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFilterEngine {
    matcher: RequirementMatcher,
}

impl CatalogFilterEngine {
    pub fn new() -> Self {
        Self {
            matcher: RequirementMatcher::new(GradeConversionEngine::new()),
        }
    }

    pub fn filter(
        &self,
        records: &[CatalogRecord],
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
        rates: &RateSnapshot,
    ) -> Vec<CatalogMatch> {
        records
            .iter()
            .filter(|record| self.matches(record, criteria, now, rates))
            .map(|record| annotate(record.clone(), criteria, now, rates))
            .collect()
    }

    /// AND across categories; each predicate is evaluated independently.
    pub fn matches(
        &self,
        record: &CatalogRecord,
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
        rates: &RateSnapshot,
    ) -> bool {
        matches_search(record, criteria.search.as_deref())
            && any_of_text(&criteria.countries, &record.country)
            && any_overlap_text(&criteria.subjects, &record.subjects)
            && any_overlap(&criteria.study_types, &record.study_types)
            && any_of(&criteria.institution_types, &record.institution_type)
            && matches_intake_state(record, criteria, now)
            && self.matches_grade(record, criteria)
            && matches_fees(record, criteria, rates)
    }

    fn matches_grade(&self, record: &CatalogRecord, criteria: &FilterCriteria) -> bool {
        match &criteria.grade {
            Some(grade) => self.matcher.matches_any(grade, &record.grade_requirements),
            None => true,
        }
    }
}

fn matches_search(record: &CatalogRecord, needle: Option<&str>) -> bool {
    let Some(needle) = needle.map(str::trim).filter(|needle| !needle.is_empty()) else {
        return true;
    };

    contains_normalized(&record.name, needle)
        || contains_normalized(&record.country, needle)
        || contains_normalized(&record.city, needle)
}

fn any_of<T: PartialEq>(selected: &[T], value: &T) -> bool {
    selected.is_empty() || selected.contains(value)
}

fn any_of_text(selected: &[String], value: &str) -> bool {
    selected.is_empty()
        || selected
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(value))
}

fn any_overlap<T: PartialEq>(selected: &[T], values: &[T]) -> bool {
    selected.is_empty() || values.iter().any(|value| selected.contains(value))
}

fn any_overlap_text(selected: &[String], values: &[String]) -> bool {
    selected.is_empty()
        || values.iter().any(|value| {
            selected
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(value))
        })
}

fn matches_intake_state(record: &CatalogRecord, criteria: &FilterCriteria, now: DateTime<Utc>) -> bool {
    if criteria.intake_statuses.is_empty() {
        return true;
    }

    if record.intakes.is_empty() {
        return criteria
            .intake_statuses
            .contains(&no_dates_view().status);
    }

    record
        .intakes
        .iter()
        .any(|intake| criteria.intake_statuses.contains(&status_at(intake, now).status))
}

/// Fee range check in the criteria currency. Records without a parsable
/// price, and conversions the snapshot cannot satisfy, fail open so
/// degraded data never hides a record.
fn matches_fees(record: &CatalogRecord, criteria: &FilterCriteria, rates: &RateSnapshot) -> bool {
    if criteria.min_fees.is_none() && criteria.max_fees.is_none() {
        return true;
    }

    let Some(display) = record.tuition_display.as_deref() else {
        return true;
    };

    let quantity = pricing::parse(display);
    let target = criteria.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    let Some(amount) = rates.convert(quantity.amount, &quantity.currency, target) else {
        return true;
    };

    criteria.min_fees.map_or(true, |min| amount >= min)
        && criteria.max_fees.map_or(true, |max| amount <= max)
}

fn annotate(
    record: CatalogRecord,
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
    rates: &RateSnapshot,
) -> CatalogMatch {
    let next = select_next_intake(&record.intakes, now);
    let intake = match next {
        Some(intake) => status_at(intake, now),
        // Every dated window has passed; report the most recent one.
        None => record
            .intakes
            .iter()
            .filter(|intake| {
                intake.application_opens.is_some() && intake.application_closes.is_some()
            })
            .max_by_key(|intake| intake.application_closes)
            .map(|intake| status_at(intake, now))
            .unwrap_or_else(no_dates_view),
    };
    let next_intake = next.map(|intake| intake.name.clone());

    let target = criteria.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
    let tuition = record.tuition_display.as_deref().map(|display| {
        let quantity = pricing::parse(display);
        pricing::to_display_currency(&quantity, target, rates)
    });

    CatalogMatch {
        record,
        intake,
        next_intake,
        tuition,
    }
}
