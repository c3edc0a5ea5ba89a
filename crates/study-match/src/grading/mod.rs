//! Grade-scale conversion and eligibility matching.
//!
//! Every known grading scale maps linearly onto a common 0-10 scale so
//! grades from heterogeneous systems can be compared. Unknown scale
//! codes are tolerated: conversions fall back to the untransformed
//! value and requirement checks fail open, so one malformed catalog
//! record never aborts a filter pass.

mod conversion;
mod registry;
mod requirement;

pub use conversion::{GradeConversionEngine, NormalizedGrade};
pub use registry::{grade_system, Grade, GradeError, GradeSystem};
pub use requirement::{GradeRequirement, RequirementMatcher};
