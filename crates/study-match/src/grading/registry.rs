use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A named grading scale with its native bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeSystem {
    pub code: &'static str,
    pub min_value: f64,
    pub max_value: f64,
}

/// A single academic score in its native scale. The system code is kept
/// as supplied by the catalog; resolution against the registry happens
/// at conversion time so malformed codes stay representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub value: f64,
    pub system: String,
}

impl Grade {
    pub fn new(value: f64, system: impl Into<String>) -> Self {
        Self {
            value,
            system: system.into(),
        }
    }
}

/// Error raised when a scale code does not resolve against the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GradeError {
    #[error("unknown grade system '{0}'")]
    UnknownSystem(String),
}

static GRADE_SYSTEMS: OnceLock<HashMap<&'static str, GradeSystem>> = OnceLock::new();

/// Resolve a scale code against the fixed registry.
pub fn grade_system(code: &str) -> Result<&'static GradeSystem, GradeError> {
    systems()
        .get(code)
        .ok_or_else(|| GradeError::UnknownSystem(code.to_string()))
}

fn systems() -> &'static HashMap<&'static str, GradeSystem> {
    GRADE_SYSTEMS.get_or_init(|| {
        const SYSTEMS: &[(&str, f64, f64)] = &[
            ("percentage", 0.0, 100.0),
            ("standard-10", 0.0, 10.0),
            ("cgpa-4", 0.0, 4.0),
            ("cgpa-5", 0.0, 5.0),
            ("cgpa-7", 0.0, 7.0),
            ("cgpa-10", 0.0, 10.0),
            ("cgpa-20", 0.0, 20.0),
        ];

        let mut map = HashMap::with_capacity(SYSTEMS.len());
        for (code, min_value, max_value) in SYSTEMS {
            map.insert(
                *code,
                GradeSystem {
                    code,
                    min_value: *min_value,
                    max_value: *max_value,
                },
            );
        }
        map
    })
}
