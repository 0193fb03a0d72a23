use std::cmp::Ordering;

use tracing::warn;

use crate::error::ScoringError;
use crate::models::{CandidateResult, CandidateScore, PerformanceMetrics};

pub const ACCURACY_WEIGHT: f64 = 0.5;
pub const TIME_EFFICIENCY_WEIGHT: f64 = 0.3;
pub const COMPLETION_WEIGHT: f64 = 0.2;

const RATING_SCALE: f64 = 5.0;

/// Share of the time budget left unused, as a percentage with one decimal.
///
/// Overruns score as if exactly the budget was used. `max_seconds` must be
/// positive; the caller guards that.
pub fn time_efficiency(actual_seconds: f64, max_seconds: f64) -> f64 {
    let effective = actual_seconds.min(max_seconds);
    let efficiency = (max_seconds - effective) / max_seconds * 100.0;
    round1(efficiency.clamp(0.0, 100.0))
}

/// Weighted sum of the three signals on a 0 to 5 scale, unrounded.
pub fn weighted_rating(accuracy: f64, time_efficiency: f64, completion_rate: f64) -> f64 {
    let accuracy = accuracy / 10.0 * RATING_SCALE;
    let time_efficiency = time_efficiency / 100.0 * RATING_SCALE;
    let completion_rate = completion_rate / 100.0 * RATING_SCALE;

    accuracy * ACCURACY_WEIGHT
        + time_efficiency * TIME_EFFICIENCY_WEIGHT
        + completion_rate * COMPLETION_WEIGHT
}

/// Composite percentage. Inputs are not validated; out-of-range values flow
/// straight through the arithmetic.
pub fn composite_score(accuracy: f64, time_efficiency: f64, completion_rate: f64) -> f64 {
    round1(weighted_rating(accuracy, time_efficiency, completion_rate) * 20.0)
}

pub fn checked_time_efficiency(
    actual_seconds: f64,
    max_seconds: f64,
) -> Result<f64, ScoringError> {
    ensure_finite("max_seconds", max_seconds)?;
    ensure_finite("actual_seconds", actual_seconds)?;
    if max_seconds <= 0.0 {
        return Err(ScoringError::NonPositiveBudget { max_seconds });
    }
    if actual_seconds < 0.0 {
        return Err(ScoringError::NegativeElapsed { actual_seconds });
    }

    Ok(time_efficiency(actual_seconds, max_seconds))
}

pub fn checked_composite_score(
    accuracy: f64,
    time_efficiency: f64,
    completion_rate: f64,
) -> Result<f64, ScoringError> {
    ensure_range("accuracy", accuracy, 10.0)?;
    ensure_range("time_efficiency", time_efficiency, 100.0)?;
    ensure_range("completion_rate", completion_rate, 100.0)?;

    Ok(composite_score(accuracy, time_efficiency, completion_rate))
}

impl PerformanceMetrics {
    /// Validates the externally computed signals and derives the rest.
    pub fn derive(
        accuracy: f64,
        completion_rate: f64,
        elapsed_seconds: f64,
        max_seconds: f64,
    ) -> Result<Self, ScoringError> {
        let time_efficiency = checked_time_efficiency(elapsed_seconds, max_seconds)?;
        // Range-checks all three signals before anything is stored.
        checked_composite_score(accuracy, time_efficiency, completion_rate)?;

        Ok(Self {
            accuracy,
            completion_rate,
            time_efficiency,
            average_rating: round1(weighted_rating(accuracy, time_efficiency, completion_rate)),
        })
    }

    pub fn composite(&self) -> f64 {
        composite_score(self.accuracy, self.time_efficiency, self.completion_rate)
    }
}

pub fn score_result(
    result: &CandidateResult,
    max_seconds: f64,
) -> Result<CandidateScore, ScoringError> {
    let metrics = PerformanceMetrics::derive(
        result.accuracy,
        result.completion_rate,
        result.elapsed_seconds,
        max_seconds,
    )?;
    Ok(CandidateScore {
        result_id: result.result_id,
        interview_id: result.interview_id,
        candidate_name: result.candidate_name.clone(),
        candidate_email: result.candidate_email.clone(),
        interview_type: result.interview_type,
        composite: metrics.composite(),
        metrics,
    })
}

/// Scores every result and orders them best first. Results with invalid
/// signals are logged and left out.
pub fn rank_candidates(results: &[CandidateResult], max_seconds: f64) -> Vec<CandidateScore> {
    let mut scores: Vec<CandidateScore> = results
        .iter()
        .filter_map(|result| match score_result(result, max_seconds) {
            Ok(score) => Some(score),
            Err(err) => {
                warn!(result_id = %result.result_id, error = %err, "skipping unscorable result");
                None
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.composite
            .partial_cmp(&a.composite)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.metrics
                    .accuracy
                    .partial_cmp(&a.metrics.accuracy)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.candidate_name.cmp(&b.candidate_name))
    });
    scores
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoringError::NotFinite { field })
    }
}

fn ensure_range(field: &'static str, value: f64, max: f64) -> Result<(), ScoringError> {
    ensure_finite(field, value)?;
    if (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::OutOfRange {
            field,
            value,
            min: 0.0,
            max,
        })
    }
}
