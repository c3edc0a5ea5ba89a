use crate::grading::{Grade, GradeRequirement};
use crate::intake::{Intake, IntakeStatus, IntakeStatusView};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

/// Level of study a record is offered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyType {
    Foundation,
    Diploma,
    Bachelors,
    Masters,
    Doctorate,
}

impl StudyType {
    pub const fn label(self) -> &'static str {
        match self {
            StudyType::Foundation => "foundation",
            StudyType::Diploma => "diploma",
            StudyType::Bachelors => "bachelors",
            StudyType::Masters => "masters",
            StudyType::Doctorate => "doctorate",
        }
    }

    /// Tolerant token parsing for feed cells.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "foundation" => Some(StudyType::Foundation),
            "diploma" => Some(StudyType::Diploma),
            "bachelors" | "bachelor" | "bachelor's" | "undergraduate" => Some(StudyType::Bachelors),
            "masters" | "master" | "master's" | "postgraduate" => Some(StudyType::Masters),
            "doctorate" | "phd" => Some(StudyType::Doctorate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstitutionType {
    Public,
    Private,
}

impl InstitutionType {
    pub const fn label(self) -> &'static str {
        match self {
            InstitutionType::Public => "public",
            InstitutionType::Private => "private",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "public" => Some(InstitutionType::Public),
            "private" => Some(InstitutionType::Private),
            _ => None,
        }
    }
}

/// Externally supplied establishment/program record, as fetched from
/// the catalog provider. Source records are never mutated; everything
/// the filter derives from them is recomputed per pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: RecordId,
    pub name: String,
    pub country: String,
    pub city: String,
    pub institution_type: InstitutionType,
    pub subjects: Vec<String>,
    pub study_types: Vec<StudyType>,
    /// Free-form tuition display string, e.g. `"€170 - €3,770"`.
    pub tuition_display: Option<String>,
    pub grade_requirements: Vec<GradeRequirement>,
    pub intakes: Vec<Intake>,
}

/// Independent predicates combined with AND semantics across categories
/// and any-of semantics within a category's multi-select list. Empty
/// selections match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub study_types: Vec<StudyType>,
    #[serde(default)]
    pub institution_types: Vec<InstitutionType>,
    #[serde(default)]
    pub intake_statuses: Vec<IntakeStatus>,
    /// Candidate grade; the grade predicate only applies when present.
    #[serde(default)]
    pub grade: Option<Grade>,
    #[serde(default)]
    pub min_fees: Option<f64>,
    #[serde(default)]
    pub max_fees: Option<f64>,
    /// Currency the fee range is expressed in and results are displayed
    /// in. Defaults to USD.
    #[serde(default)]
    pub currency: Option<String>,
}

/// A record that passed every active criterion, annotated with the
/// derived fields presentation needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub record: CatalogRecord,
    pub intake: IntakeStatusView,
    pub next_intake: Option<String>,
    pub tuition: Option<String>,
}
