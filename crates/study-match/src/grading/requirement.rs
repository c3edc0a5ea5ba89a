use super::conversion::GradeConversionEngine;
use super::registry::Grade;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A minimum-score requirement declared by a program, in the scale the
/// program chose. Programs may declare several alternative requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRequirement {
    pub minimum_score: f64,
    pub grade_system: String,
}

/// Decides whether a candidate grade clears a program's requirements by
/// comparing both sides on the common scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementMatcher {
    engine: GradeConversionEngine,
}

impl RequirementMatcher {
    pub fn new(engine: GradeConversionEngine) -> Self {
        Self { engine }
    }

    /// True when the candidate's normalized grade reaches the
    /// requirement's normalized threshold. A requirement whose scale
    /// does not resolve counts as satisfied so malformed catalog data
    /// never hides an otherwise-eligible program.
    pub fn meets(&self, candidate: &Grade, requirement: &GradeRequirement) -> bool {
        let threshold = Grade::new(requirement.minimum_score, requirement.grade_system.clone());
        let threshold = match self.engine.try_normalize(&threshold) {
            Ok(normalized) => normalized,
            Err(err) => {
                warn!(system = %requirement.grade_system, %err, "requirement treated as satisfied");
                return true;
            }
        };

        self.engine.normalize(candidate) >= threshold
    }

    /// OR semantics across requirement entries; a program with no grade
    /// requirements is vacuously eligible.
    pub fn matches_any(&self, candidate: &Grade, requirements: &[GradeRequirement]) -> bool {
        if requirements.is_empty() {
            return true;
        }

        requirements
            .iter()
            .any(|requirement| self.meets(candidate, requirement))
    }
}
