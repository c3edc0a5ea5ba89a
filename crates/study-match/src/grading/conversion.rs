use super::registry::{grade_system, Grade, GradeError, GradeSystem};
use tracing::warn;

/// A grade projected onto the common 0-10 comparison scale.
pub type NormalizedGrade = f64;

const PERCENTAGE: &str = "percentage";

/// Stateless converter between registered grading scales.
///
/// The fallible `try_*` variants surface unknown scale codes; the plain
/// entry points log the condition and return the untransformed value so
/// a single bad record never aborts a batch filter pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradeConversionEngine;

impl GradeConversionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Map a grade linearly from its native bounds onto `[0, 10]`.
    pub fn normalize(&self, grade: &Grade) -> NormalizedGrade {
        match self.try_normalize(grade) {
            Ok(normalized) => normalized,
            Err(err) => {
                warn!(system = %grade.system, %err, "grade left unconverted");
                grade.value
            }
        }
    }

    pub fn try_normalize(&self, grade: &Grade) -> Result<NormalizedGrade, GradeError> {
        let system = grade_system(&grade.system)?;

        // The percentage shortcut must stay numerically identical to the
        // generic map for min=0, max=100; a test pins the equivalence.
        if system.code == PERCENTAGE {
            return Ok(grade.value / 10.0);
        }

        Ok(linear_map(grade.value, system))
    }

    /// Inverse of `normalize`: project a 0-10 score into a target scale.
    pub fn denormalize(&self, value: NormalizedGrade, system: &str) -> f64 {
        match self.try_denormalize(value, system) {
            Ok(projected) => projected,
            Err(err) => {
                warn!(%system, %err, "normalized grade left unconverted");
                value
            }
        }
    }

    pub fn try_denormalize(&self, value: NormalizedGrade, system: &str) -> Result<f64, GradeError> {
        let system = grade_system(system)?;
        Ok(system.min_value + value / 10.0 * (system.max_value - system.min_value))
    }

    /// Convert a grade into another scale. Same-scale conversion returns
    /// the original value unchanged.
    pub fn convert(&self, grade: &Grade, to_system: &str) -> f64 {
        if grade.system == to_system {
            return grade.value;
        }

        match self
            .try_normalize(grade)
            .and_then(|normalized| self.try_denormalize(normalized, to_system))
        {
            Ok(converted) => converted,
            Err(err) => {
                warn!(from = %grade.system, to = %to_system, %err, "grade left unconverted");
                grade.value
            }
        }
    }
}

fn linear_map(value: f64, system: &GradeSystem) -> f64 {
    let percentage = (value - system.min_value) / (system.max_value - system.min_value) * 100.0;
    percentage / 10.0
}
