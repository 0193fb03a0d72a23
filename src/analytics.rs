use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{
    DayBucket, InterviewRecord, InterviewStatus, InterviewType, LabeledBucket, TimeWindow,
};

/// First calendar day covered by `window` when it ends on `today`.
pub fn window_start(window: TimeWindow, today: NaiveDate) -> NaiveDate {
    today - Duration::days(window.days() - 1)
}

/// One bucket per local calendar day in the window, oldest first, zero days
/// included. Records created outside the window are dropped.
pub fn bucket_by_day(
    records: &[InterviewRecord],
    window: TimeWindow,
    today: NaiveDate,
) -> Vec<DayBucket> {
    bucket_by_day_in(records, window, today, &Local)
}

/// Same as [`bucket_by_day`] with an explicit timezone for the day boundary.
pub fn bucket_by_day_in<Tz: TimeZone>(
    records: &[InterviewRecord],
    window: TimeWindow,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<DayBucket> {
    let start = window_start(window, today);
    let mut buckets: Vec<DayBucket> = (0..window.days())
        .map(|offset| DayBucket {
            date: start + Duration::days(offset),
            behavioral_count: 0,
            coding_count: 0,
        })
        .collect();

    let mut dropped = 0usize;
    for record in records {
        let day = day_key(&record.created_at, tz);
        let offset = (day - start).num_days();
        let Some(bucket) = usize::try_from(offset)
            .ok()
            .and_then(|index| buckets.get_mut(index))
        else {
            dropped += 1;
            continue;
        };

        if record.origin.is_coding() {
            bucket.coding_count += 1;
        } else {
            bucket.behavioral_count += 1;
        }
    }

    if dropped > 0 {
        debug!(dropped, %window, "records outside trend window");
    }

    buckets
}

/// Scheduled, Completed, No-show, Draft, in that order. Unrecognized
/// statuses land in none of them.
pub fn bucket_by_status(records: &[InterviewRecord]) -> Vec<LabeledBucket> {
    let mut counts = [0u32; 4];
    for record in records {
        let slot = match record.status {
            InterviewStatus::Scheduled => 0,
            InterviewStatus::Completed => 1,
            InterviewStatus::NoShow => 2,
            InterviewStatus::Draft => 3,
            InterviewStatus::Unrecognized(_) => continue,
        };
        counts[slot] += 1;
    }

    ["Scheduled", "Completed", "No-show", "Draft"]
        .into_iter()
        .zip(counts)
        .map(|(label, value)| LabeledBucket { label, value })
        .collect()
}

/// Behavioral, MCQ, Combo, Coding, in that order.
pub fn bucket_by_type(records: &[InterviewRecord]) -> Vec<LabeledBucket> {
    tally_by_type(records)
        .into_iter()
        .map(|(kind, total, _)| LabeledBucket {
            label: kind.label(),
            value: total,
        })
        .collect()
}

/// Rounded completed/total percentage per type; an empty type reports 0.
pub fn completion_rate_by_type(records: &[InterviewRecord]) -> Vec<LabeledBucket> {
    tally_by_type(records)
        .into_iter()
        .map(|(kind, total, completed)| LabeledBucket {
            label: kind.label(),
            value: if total == 0 {
                0
            } else {
                (completed as f64 / total as f64 * 100.0).round() as u32
            },
        })
        .collect()
}

/// Everything the trends dashboard draws for one window.
#[derive(Debug, Clone, Serialize)]
pub struct TrendSnapshot {
    pub window: TimeWindow,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayBucket>,
    pub statuses: Vec<LabeledBucket>,
    pub types: Vec<LabeledBucket>,
    pub completion_rates: Vec<LabeledBucket>,
}

impl TrendSnapshot {
    pub fn build(records: &[InterviewRecord], window: TimeWindow, today: NaiveDate) -> Self {
        Self {
            window,
            start: window_start(window, today),
            end: today,
            days: bucket_by_day(records, window, today),
            statuses: bucket_by_status(records),
            types: bucket_by_type(records),
            completion_rates: completion_rate_by_type(records),
        }
    }

    pub fn total_interviews(&self) -> u32 {
        self.types.iter().map(|bucket| bucket.value).sum()
    }

    /// True when any record landed inside the day window.
    pub fn has_daily_activity(&self) -> bool {
        self.days
            .iter()
            .any(|day| day.behavioral_count + day.coding_count > 0)
    }
}

fn day_key<Tz: TimeZone>(created_at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    created_at.with_timezone(tz).date_naive()
}

/// (type, total, completed) for each type in display order.
fn tally_by_type(records: &[InterviewRecord]) -> [(InterviewType, u32, u32); 4] {
    let mut tallies = InterviewType::ALL.map(|kind| (kind, 0u32, 0u32));
    for record in records {
        let kind = record.origin.classify();
        if let Some(entry) = tallies.iter_mut().find(|(slot, _, _)| *slot == kind) {
            entry.1 += 1;
            if record.status.is_completed() {
                entry.2 += 1;
            }
        }
    }
    tallies
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date")
    }

    fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time");
        date.and_time(time).and_utc()
    }

    fn behavioral(status: &str, kind: Option<&str>, created_at: DateTime<Utc>) -> InterviewRecord {
        InterviewRecord::behavioral(
            Uuid::new_v4(),
            created_at,
            InterviewStatus::parse(Some(status)),
            InterviewType::parse(kind),
        )
    }

    fn coding(status: &str, created_at: DateTime<Utc>) -> InterviewRecord {
        InterviewRecord::coding(Uuid::new_v4(), created_at, InterviewStatus::parse(Some(status)))
    }

    fn values(buckets: &[LabeledBucket]) -> Vec<(&'static str, u32)> {
        buckets.iter().map(|b| (b.label, b.value)).collect()
    }

    #[test]
    fn week_covers_seven_ascending_days() {
        let records = vec![
            behavioral("completed", None, at(today(), 10)),
            behavioral("scheduled", None, at(today() - Duration::days(6), 9)),
            coding("completed", at(today() - Duration::days(2), 14)),
            behavioral("completed", None, at(today() - Duration::days(7), 12)),
            coding("completed", at(today() + Duration::days(1), 8)),
        ];

        let days = bucket_by_day_in(&records, TimeWindow::Week, today(), &Utc);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].date, today() - Duration::days(6));
        assert_eq!(days[6].date, today());
        assert!(days.windows(2).all(|pair| pair[1].date - pair[0].date == Duration::days(1)));

        assert_eq!(days[0].behavioral_count, 1);
        assert_eq!(days[4].coding_count, 1);
        assert_eq!(days[6].behavioral_count, 1);
        let counted: u32 = days.iter().map(|d| d.behavioral_count + d.coding_count).sum();
        assert_eq!(counted, 3);
    }

    #[test]
    fn month_and_quarter_include_empty_days() {
        let month = bucket_by_day_in(&[], TimeWindow::Month, today(), &Utc);
        assert_eq!(month.len(), 30);
        assert!(month.iter().all(|d| d.behavioral_count == 0 && d.coding_count == 0));

        let quarter = bucket_by_day_in(&[], TimeWindow::Quarter, today(), &Utc);
        assert_eq!(quarter.len(), 90);
        assert_eq!(quarter[0].date, window_start(TimeWindow::Quarter, today()));
    }

    #[test]
    fn local_day_boundary_is_used_by_default() {
        let now = Utc::now();
        let local_today = now.with_timezone(&Local).date_naive();
        let records = vec![coding("completed", now)];

        let days = bucket_by_day(&records, TimeWindow::Week, local_today);
        assert_eq!(days[6].coding_count, 1);
    }

    #[test]
    fn status_buckets_have_fixed_order() {
        assert_eq!(
            values(&bucket_by_status(&[])),
            vec![("Scheduled", 0), ("Completed", 0), ("No-show", 0), ("Draft", 0)]
        );

        let records = vec![
            behavioral("NO-SHOW", None, at(today(), 9)),
            behavioral("draft", None, at(today(), 9)),
            behavioral("archived", None, at(today(), 9)),
            InterviewRecord::coding(Uuid::new_v4(), at(today(), 9), InterviewStatus::parse(None)),
        ];
        assert_eq!(
            values(&bucket_by_status(&records)),
            vec![("Scheduled", 0), ("Completed", 0), ("No-show", 1), ("Draft", 2)]
        );
    }

    #[test]
    fn type_buckets_fall_back_to_behavioral() {
        let records = vec![
            behavioral("completed", None, at(today(), 9)),
            behavioral("completed", Some("Behavioral"), at(today(), 9)),
            behavioral("completed", Some("mcq"), at(today(), 9)),
            behavioral("scheduled", Some("combo"), at(today(), 9)),
            coding("draft", at(today(), 9)),
        ];
        assert_eq!(
            values(&bucket_by_type(&records)),
            vec![("Behavioral", 2), ("MCQ", 1), ("Combo", 1), ("Coding", 1)]
        );
    }

    #[test]
    fn coding_typed_behavioral_record_counts_by_type_but_not_by_origin() {
        let records = vec![
            behavioral("completed", Some("coding"), at(today(), 9)),
            coding("scheduled", at(today(), 10)),
        ];

        assert_eq!(
            values(&bucket_by_type(&records)),
            vec![("Behavioral", 0), ("MCQ", 0), ("Combo", 0), ("Coding", 2)]
        );
        assert_eq!(
            values(&completion_rate_by_type(&records)),
            vec![("Behavioral", 0), ("MCQ", 0), ("Combo", 0), ("Coding", 50)]
        );

        let days = bucket_by_day_in(&records, TimeWindow::Week, today(), &Utc);
        assert_eq!(days[6].behavioral_count, 1);
        assert_eq!(days[6].coding_count, 1);
    }

    #[test]
    fn mixed_day_scenario() {
        let now = at(today(), 11);
        let records = vec![
            behavioral("completed", None, now),
            behavioral("completed", None, now),
            behavioral("scheduled", None, now),
            coding("completed", now),
        ];

        let statuses = bucket_by_status(&records);
        assert_eq!(
            values(&statuses),
            vec![("Scheduled", 1), ("Completed", 3), ("No-show", 0), ("Draft", 0)]
        );
        let total: u32 = statuses.iter().map(|b| b.value).sum();
        assert_eq!(total as usize, records.len());

        assert_eq!(
            values(&completion_rate_by_type(&records)),
            vec![("Behavioral", 67), ("MCQ", 0), ("Combo", 0), ("Coding", 100)]
        );
    }

    #[test]
    fn empty_types_report_zero_rate() {
        let rates = completion_rate_by_type(&[]);
        assert_eq!(rates.len(), 4);
        assert!(rates.iter().all(|b| b.value == 0));
    }

    #[test]
    fn snapshot_bundles_every_series() {
        let records = vec![behavioral("completed", Some("mcq"), at(today(), 12))];
        let snapshot = TrendSnapshot::build(&records, TimeWindow::Month, today());
        assert_eq!(snapshot.days.len(), 30);
        assert_eq!(snapshot.start, today() - Duration::days(29));
        assert_eq!(snapshot.end, today());
        assert_eq!(snapshot.total_interviews(), 1);
        assert_eq!(snapshot.completion_rates[1].value, 100);
    }
}
