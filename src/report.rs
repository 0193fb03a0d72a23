use std::fmt::Write;

use crate::analytics::TrendSnapshot;
use crate::models::{CandidateScore, LabeledBucket};

/// Renders the results ranking and the trend series as a markdown document.
pub fn build_report(
    scope: Option<&str>,
    trends: &TrendSnapshot,
    scores: &[CandidateScore],
    limit: usize,
) -> String {
    let mut output = String::new();
    let scope_label = scope.unwrap_or("all companies");

    let _ = writeln!(output, "# Interview Analytics Report");
    let _ = writeln!(
        output,
        "Generated for {} over the last {} ({} to {})",
        scope_label, trends.window, trends.start, trends.end
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Candidate Rankings");
    if scores.is_empty() {
        let _ = writeln!(output, "No graded results available.");
    } else {
        let _ = writeln!(
            output,
            "| # | Candidate | Type | Accuracy | Time eff. | Completion | Rating | Score |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for (rank, score) in scores.iter().take(limit).enumerate() {
            let _ = writeln!(
                output,
                "| {} | {} ({}) | {} | {:.1}/10 | {:.1}% | {:.0}% | {:.1}/5 | {:.1}% |",
                rank + 1,
                score.candidate_name,
                score.candidate_email,
                score.interview_type.label(),
                score.metrics.accuracy,
                score.metrics.time_efficiency,
                score.metrics.completion_rate,
                score.metrics.average_rating,
                score.composite
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Interviews by Status");
    write_buckets(&mut output, &trends.statuses, "");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Interviews by Type");
    write_buckets(&mut output, &trends.types, "");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Completion Rate by Type");
    write_buckets(&mut output, &trends.completion_rates, "%");

    let _ = writeln!(output);
    let _ = writeln!(output, "## Daily Activity");
    if !trends.has_daily_activity() {
        let _ = writeln!(output, "No interviews created in this window.");
    } else {
        let _ = writeln!(output, "| Date | Behavioral | Coding |");
        let _ = writeln!(output, "|---|---|---|");
        for day in &trends.days {
            let _ = writeln!(
                output,
                "| {} | {} | {} |",
                day.date, day.behavioral_count, day.coding_count
            );
        }
    }

    output
}

fn write_buckets(output: &mut String, buckets: &[LabeledBucket], suffix: &str) {
    for bucket in buckets {
        let _ = writeln!(output, "- {}: {}{}", bucket.label, bucket.value, suffix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CandidateResult, InterviewRecord, InterviewStatus, InterviewType, TimeWindow,
    };
    use crate::scoring::score_result;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date")
    }

    #[test]
    fn empty_report_mentions_missing_data() {
        let trends = TrendSnapshot::build(&[], TimeWindow::Week, today());
        let report = build_report(None, &trends, &[], 10);

        assert!(report.contains("Generated for all companies over the last week"));
        assert!(report.contains("No graded results available."));
        assert!(report.contains("- Draft: 0"));
        assert!(report.contains("- Coding: 0%"));
        assert!(report.contains("No interviews created in this window."));
    }

    #[test]
    fn report_lists_ranked_candidates() {
        let records = vec![InterviewRecord::behavioral(
            Uuid::new_v4(),
            Utc::now(),
            InterviewStatus::Completed,
            Some(InterviewType::Combo),
        )];
        let trends = TrendSnapshot::build(&records, TimeWindow::Week, today());
        let result = CandidateResult {
            result_id: Uuid::new_v4(),
            interview_id: Uuid::new_v4(),
            candidate_name: "Avery Lee".to_string(),
            candidate_email: "avery@example.com".to_string(),
            interview_type: InterviewType::Combo,
            accuracy: 8.0,
            completion_rate: 90.0,
            elapsed_seconds: 150.0,
        };
        let scores = vec![score_result(&result, 600.0).expect("scorable")];

        let report = build_report(Some("acme"), &trends, &scores, 5);
        assert!(report.contains("| 1 | Avery Lee (avery@example.com) | Combo |"));
        assert!(report.contains("| 4.0/5 | 80.5% |"));
        assert!(report.contains("- Combo: 1"));
        assert!(report.contains("- Combo: 100%"));
    }

    #[test]
    fn daily_table_skipped_when_only_older_records() {
        let long_ago = NaiveDate::from_ymd_opt(2025, 12, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
            .and_utc();
        let records = vec![InterviewRecord::coding(
            Uuid::new_v4(),
            long_ago,
            InterviewStatus::Completed,
        )];
        let trends = TrendSnapshot::build(&records, TimeWindow::Week, today());
        let report = build_report(None, &trends, &[], 10);

        assert!(report.contains("- Coding: 1"));
        assert!(report.contains("No interviews created in this window."));
        assert!(!report.contains("| Date | Behavioral | Coding |"));
    }
}
