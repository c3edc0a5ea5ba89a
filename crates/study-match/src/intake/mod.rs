//! Application-window state derived from wall-clock time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named application window owned by a program or establishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intake {
    pub name: String,
    pub application_opens: Option<DateTime<Utc>>,
    pub application_closes: Option<DateTime<Utc>>,
}

/// Window state relative to an evaluation instant. Never stored;
/// recomputed against `now` on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeStatus {
    Open,
    ClosingSoon,
    NotOpen,
    Closed,
    NoDates,
}

impl IntakeStatus {
    pub const fn label(self) -> &'static str {
        match self {
            IntakeStatus::Open => "open",
            IntakeStatus::ClosingSoon => "closing-soon",
            IntakeStatus::NotOpen => "not-open",
            IntakeStatus::Closed => "closed",
            IntakeStatus::NoDates => "no-dates",
        }
    }

    /// Whether a learner can still act on the window.
    pub const fn is_actionable(self) -> bool {
        matches!(self, IntakeStatus::Open | IntakeStatus::ClosingSoon)
    }
}

/// Status plus the urgency text shown next to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeStatusView {
    pub status: IntakeStatus,
    pub text: String,
}

pub const CLOSING_SOON_WINDOW_DAYS: i64 = 30;

const MS_PER_DAY: i64 = 86_400_000;

/// Evaluate a single window against `now`. The checks are mutually
/// exclusive and ordered; the first match wins.
pub fn status_at(intake: &Intake, now: DateTime<Utc>) -> IntakeStatusView {
    let (opens, closes) = match (intake.application_opens, intake.application_closes) {
        (Some(opens), Some(closes)) => (opens, closes),
        _ => return no_dates_view(),
    };

    if opens <= now && now <= closes {
        let days_left = days_until(closes, now);
        if days_left > CLOSING_SOON_WINDOW_DAYS {
            return IntakeStatusView {
                status: IntakeStatus::Open,
                text: "Applications open".to_string(),
            };
        }
        return IntakeStatusView {
            status: IntakeStatus::ClosingSoon,
            text: format!("Closing in {days_left} day(s)"),
        };
    }

    if now < opens {
        return IntakeStatusView {
            status: IntakeStatus::NotOpen,
            text: format!("Opens {}", opens.format("%-d %b %Y")),
        };
    }

    IntakeStatusView {
        status: IntakeStatus::Closed,
        text: "Applications closed".to_string(),
    }
}

pub fn no_dates_view() -> IntakeStatusView {
    IntakeStatusView {
        status: IntakeStatus::NoDates,
        text: "Dates to be announced".to_string(),
    }
}

/// Earliest not-yet-closed window among the fully dated intakes,
/// regardless of input order. `None` when every window has passed.
pub fn select_next_intake(intakes: &[Intake], now: DateTime<Utc>) -> Option<&Intake> {
    let mut dated: Vec<&Intake> = intakes
        .iter()
        .filter(|intake| {
            intake.application_opens.is_some() && intake.application_closes.is_some()
        })
        .collect();
    dated.sort_by_key(|intake| intake.application_opens);

    dated
        .into_iter()
        .find(|intake| intake.application_closes.is_some_and(|closes| closes >= now))
}

fn days_until(closes: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (closes - now).num_milliseconds();
    // Ceiling division; only reached while now <= closes.
    (ms + MS_PER_DAY - 1).div_euclid(MS_PER_DAY)
}
