use super::domain::{CatalogRecord, InstitutionType, RecordId, StudyType};
use crate::grading::GradeRequirement;
use crate::intake::Intake;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug)]
pub enum CatalogFeedError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CatalogFeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogFeedError::Io(err) => write!(f, "failed to read catalog feed: {}", err),
            CatalogFeedError::Csv(err) => write!(f, "invalid catalog feed data: {}", err),
        }
    }
}

impl std::error::Error for CatalogFeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogFeedError::Io(err) => Some(err),
            CatalogFeedError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogFeedError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogFeedError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// CSV ingestion of establishment/program records. A record spread
/// across several rows (one intake per row) merges by id; later rows
/// contribute additional intakes and alternative grade requirements.
pub struct CatalogFeedImporter;

impl CatalogFeedImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CatalogRecord>, CatalogFeedError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, CatalogFeedError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut order: Vec<RecordId> = Vec::new();
        let mut records: HashMap<RecordId, CatalogRecord> = HashMap::new();

        for row in csv_reader.deserialize::<FeedRow>() {
            let row = row?;
            let id = RecordId(row.record_id.clone());

            match records.entry(id) {
                Entry::Occupied(mut entry) => merge_row(entry.get_mut(), &row),
                Entry::Vacant(entry) => {
                    order.push(entry.key().clone());
                    entry.insert(record_from_row(&row));
                }
            }
        }

        Ok(order
            .into_iter()
            .filter_map(|id| records.remove(&id))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct FeedRow {
    #[serde(rename = "Record ID")]
    record_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Country", default)]
    country: String,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "Institution Type", default, deserialize_with = "empty_string_as_none")]
    institution_type: Option<String>,
    #[serde(rename = "Subjects", default, deserialize_with = "empty_string_as_none")]
    subjects: Option<String>,
    #[serde(rename = "Study Types", default, deserialize_with = "empty_string_as_none")]
    study_types: Option<String>,
    #[serde(rename = "Tuition", default, deserialize_with = "empty_string_as_none")]
    tuition: Option<String>,
    #[serde(rename = "Minimum Grade", default)]
    minimum_grade: Option<f64>,
    #[serde(rename = "Grade System", default, deserialize_with = "empty_string_as_none")]
    grade_system: Option<String>,
    #[serde(rename = "Intake", default, deserialize_with = "empty_string_as_none")]
    intake: Option<String>,
    #[serde(rename = "Opens", default, deserialize_with = "empty_string_as_none")]
    opens: Option<String>,
    #[serde(rename = "Closes", default, deserialize_with = "empty_string_as_none")]
    closes: Option<String>,
}

impl FeedRow {
    fn requirement(&self) -> Option<GradeRequirement> {
        match (self.minimum_grade, self.grade_system.as_deref()) {
            (Some(minimum_score), Some(grade_system)) => Some(GradeRequirement {
                minimum_score,
                grade_system: grade_system.to_string(),
            }),
            _ => None,
        }
    }

    fn intake(&self) -> Option<Intake> {
        let name = self.intake.as_deref()?;
        Some(Intake {
            name: name.to_string(),
            application_opens: self.opens.as_deref().and_then(parse_instant),
            application_closes: self.closes.as_deref().and_then(parse_instant),
        })
    }
}

fn record_from_row(row: &FeedRow) -> CatalogRecord {
    let institution_type = row
        .institution_type
        .as_deref()
        .and_then(InstitutionType::from_token)
        .unwrap_or_else(|| {
            warn!(record = %row.record_id, "missing institution type, assuming public");
            InstitutionType::Public
        });

    CatalogRecord {
        id: RecordId(row.record_id.clone()),
        name: row.name.clone(),
        country: row.country.clone(),
        city: row.city.clone(),
        institution_type,
        subjects: split_list(row.subjects.as_deref()),
        study_types: parse_study_types(row.record_id.as_str(), row.study_types.as_deref()),
        tuition_display: row.tuition.clone(),
        grade_requirements: row.requirement().into_iter().collect(),
        intakes: row.intake().into_iter().collect(),
    }
}

fn merge_row(record: &mut CatalogRecord, row: &FeedRow) {
    if let Some(intake) = row.intake() {
        if !record.intakes.iter().any(|known| known.name == intake.name) {
            record.intakes.push(intake);
        }
    }

    if let Some(requirement) = row.requirement() {
        if !record.grade_requirements.contains(&requirement) {
            record.grade_requirements.push(requirement);
        }
    }
}

fn split_list(cell: Option<&str>) -> Vec<String> {
    cell.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_study_types(record_id: &str, cell: Option<&str>) -> Vec<StudyType> {
    split_list(cell)
        .iter()
        .filter_map(|token| {
            let parsed = StudyType::from_token(token);
            if parsed.is_none() {
                warn!(record = %record_id, %token, "skipping unknown study type");
            }
            parsed
        })
        .collect()
}

fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
pub(crate) fn parse_instant_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_instant(value)
}
