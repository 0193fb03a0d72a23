use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle state of an interview as written by the grading process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    NoShow,
    Draft,
    /// Text that matched none of the known states. Counted nowhere.
    Unrecognized(String),
}

impl InterviewStatus {
    /// Missing status is treated as a draft; matching ignores case.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Draft;
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "draft" => Self::Draft,
            "scheduled" => Self::Scheduled,
            "completed" => Self::Completed,
            "no-show" => Self::NoShow,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Completed => write!(f, "completed"),
            Self::NoShow => write!(f, "no-show"),
            Self::Draft => write!(f, "draft"),
            Self::Unrecognized(raw) => write!(f, "{raw}"),
        }
    }
}

/// Format of an interview as chosen when it was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Behavioral,
    Mcq,
    Coding,
    Combo,
}

impl InterviewType {
    /// The four types in the order every type-keyed bucket list uses.
    pub const ALL: [InterviewType; 4] = [
        InterviewType::Behavioral,
        InterviewType::Mcq,
        InterviewType::Combo,
        InterviewType::Coding,
    ];

    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw?.trim().to_ascii_lowercase().as_str() {
            "behavioral" => Some(Self::Behavioral),
            "mcq" => Some(Self::Mcq),
            "coding" => Some(Self::Coding),
            "combo" => Some(Self::Combo),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Behavioral => "Behavioral",
            Self::Mcq => "MCQ",
            Self::Coding => "Coding",
            Self::Combo => "Combo",
        }
    }
}

/// Which interview table a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InterviewOrigin {
    Behavioral {
        interview_type: Option<InterviewType>,
    },
    Coding,
}

impl InterviewOrigin {
    /// Behavioral-origin records are classified by their own type, falling
    /// back to Behavioral when none was set. Coding-origin records are
    /// always Coding.
    pub fn classify(self) -> InterviewType {
        match self {
            Self::Behavioral { interview_type } => {
                interview_type.unwrap_or(InterviewType::Behavioral)
            }
            Self::Coding => InterviewType::Coding,
        }
    }

    pub fn is_coding(self) -> bool {
        matches!(self, Self::Coding)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: InterviewStatus,
    #[serde(flatten)]
    pub origin: InterviewOrigin,
}

impl InterviewRecord {
    pub fn behavioral(
        id: Uuid,
        created_at: DateTime<Utc>,
        status: InterviewStatus,
        interview_type: Option<InterviewType>,
    ) -> Self {
        Self {
            id,
            created_at,
            status,
            origin: InterviewOrigin::Behavioral { interview_type },
        }
    }

    pub fn coding(id: Uuid, created_at: DateTime<Utc>, status: InterviewStatus) -> Self {
        Self {
            id,
            created_at,
            status,
            origin: InterviewOrigin::Coding,
        }
    }
}

/// Lookback period selected on the trends dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Week,
    Month,
    Quarter,
}

impl TimeWindow {
    pub fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    /// Anything other than a known window name selects a week.
    pub fn from_param(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            other => Err(format!("unknown time window '{other}'")),
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Quarter => write!(f, "quarter"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub behavioral_count: u32,
    pub coding_count: u32,
}

/// A chart series point: a count or a rounded percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledBucket {
    pub label: &'static str,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// 0 to 10.
    pub accuracy: f64,
    /// 0 to 100.
    pub completion_rate: f64,
    /// 0 to 100, always recomputed from elapsed time.
    pub time_efficiency: f64,
    /// 0 to 5, always recomputed.
    pub average_rating: f64,
}

/// A graded interview as returned by the result-computation step.
#[derive(Debug, Clone)]
pub struct CandidateResult {
    pub result_id: Uuid,
    pub interview_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub interview_type: InterviewType,
    pub accuracy: f64,
    pub completion_rate: f64,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    pub result_id: Uuid,
    pub interview_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub interview_type: InterviewType,
    pub metrics: PerformanceMetrics,
    pub composite: f64,
}

/// Decisions a reviewer can take on a candidate result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalAction {
    Approve,
    Reject,
    NextRound,
    Schedule,
    Feedback,
    RequestDocuments,
}

impl ApprovalAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::NextRound => "next-round",
            Self::Schedule => "schedule",
            Self::Feedback => "feedback",
            Self::RequestDocuments => "request-documents",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_ignores_case_and_defaults_to_draft() {
        assert_eq!(InterviewStatus::parse(Some("COMPLETED")), InterviewStatus::Completed);
        assert_eq!(InterviewStatus::parse(Some("No-Show")), InterviewStatus::NoShow);
        assert_eq!(InterviewStatus::parse(None), InterviewStatus::Draft);
        assert_eq!(InterviewStatus::parse(Some("  ")), InterviewStatus::Draft);
        assert_eq!(
            InterviewStatus::parse(Some("archived")),
            InterviewStatus::Unrecognized("archived".to_string())
        );
    }

    #[test]
    fn missing_type_classifies_as_behavioral() {
        let origin = InterviewOrigin::Behavioral {
            interview_type: InterviewType::parse(None),
        };
        assert_eq!(origin.classify(), InterviewType::Behavioral);

        let mcq = InterviewOrigin::Behavioral {
            interview_type: InterviewType::parse(Some("MCQ")),
        };
        assert_eq!(mcq.classify(), InterviewType::Mcq);
        assert_eq!(InterviewOrigin::Coding.classify(), InterviewType::Coding);
    }

    #[test]
    fn invalid_window_falls_back_to_week() {
        assert_eq!(TimeWindow::from_param("quarter"), TimeWindow::Quarter);
        assert_eq!(TimeWindow::from_param("Month"), TimeWindow::Month);
        assert_eq!(TimeWindow::from_param("year"), TimeWindow::Week);
        assert_eq!(TimeWindow::Quarter.days(), 90);
    }
}
