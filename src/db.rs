use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{
    ApprovalAction, CandidateResult, InterviewRecord, InterviewStatus, InterviewType,
};

/// Company the seed data is filed under.
pub const DEMO_COMPANY_ID: Uuid = Uuid::from_u128(0x6f1c_2a4e_93b7_4d0a_8c55_1e2f_3a4b_5c6d);

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let now = Utc::now();

    // (source_key, email, type, status, days ago)
    let behavioral = vec![
        ("seed-b-001", "avery.lee@example.com", Some("behavioral"), "completed", 0),
        ("seed-b-002", "jules.moreno@example.com", Some("mcq"), "completed", 1),
        ("seed-b-003", "kiara.patel@example.com", Some("combo"), "scheduled", 2),
        ("seed-b-004", "noah.kim@example.com", None, "no-show", 4),
        ("seed-b-005", "mila.santos@example.com", Some("mcq"), "draft", 12),
        ("seed-b-006", "ezra.cohen@example.com", Some("behavioral"), "completed", 45),
    ];

    let coding = vec![
        ("seed-c-001", "avery.lee@example.com", "completed", 0),
        ("seed-c-002", "noah.kim@example.com", "scheduled", 3),
        ("seed-c-003", "ezra.cohen@example.com", "completed", 20),
    ];

    let mut interview_ids = std::collections::HashMap::new();

    for (source_key, email, interview_type, status, days_ago) in behavioral {
        let id: Uuid = sqlx::query(
            r#"
            INSERT INTO interview_analytics.behavioral_interviews
            (id, company_id, candidate_email, interview_type, interview_status, created_at, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (source_key) DO UPDATE
            SET interview_status = EXCLUDED.interview_status
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(DEMO_COMPANY_ID)
        .bind(email)
        .bind(interview_type)
        .bind(status)
        .bind(now - Duration::days(days_ago))
        .bind(source_key)
        .fetch_one(pool)
        .await?
        .get("id");
        interview_ids.insert(source_key, id);
    }

    for (source_key, email, status, days_ago) in coding {
        let id: Uuid = sqlx::query(
            r#"
            INSERT INTO interview_analytics.coding_interviews
            (id, company_id, candidate_email, interview_status, created_at, source_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (source_key) DO UPDATE
            SET interview_status = EXCLUDED.interview_status
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(DEMO_COMPANY_ID)
        .bind(email)
        .bind(status)
        .bind(now - Duration::days(days_ago))
        .bind(source_key)
        .fetch_one(pool)
        .await?
        .get("id");
        interview_ids.insert(source_key, id);
    }

    // (result id, interview source_key, type, name, email, accuracy, completion, elapsed)
    let results = vec![
        (0x01u128, "seed-b-001", "behavioral", "Avery Lee", "avery.lee@example.com", 8.5, 100.0, 340.0),
        (0x02, "seed-b-002", "mcq", "Jules Moreno", "jules.moreno@example.com", 7.0, 90.0, 480.0),
        (0x03, "seed-c-001", "coding", "Avery Lee", "avery.lee@example.com", 9.0, 80.0, 610.0),
        (0x04, "seed-b-006", "behavioral", "Ezra Cohen", "ezra.cohen@example.com", 6.0, 70.0, 200.0),
        (0x05, "seed-c-003", "coding", "Ezra Cohen", "ezra.cohen@example.com", 5.5, 100.0, 420.0),
    ];

    for (suffix, source_key, interview_type, name, email, accuracy, completion, elapsed) in results
    {
        let interview_id = interview_ids
            .get(source_key)
            .copied()
            .with_context(|| format!("seed interview {source_key} missing"))?;

        sqlx::query(
            r#"
            INSERT INTO interview_analytics.interview_results
            (id, company_id, interview_id, interview_type, candidate_name, candidate_email,
             accuracy, completion_rate, elapsed_seconds)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0000 | suffix))
        .bind(DEMO_COMPANY_ID)
        .bind(interview_id)
        .bind(interview_type)
        .bind(name)
        .bind(email)
        .bind(accuracy)
        .bind(completion)
        .bind(elapsed)
        .execute(pool)
        .await?;
    }

    info!(company_id = %DEMO_COMPANY_ID, "seed data written");
    Ok(())
}

/// Behavioral and coding interviews created on or after `since`, optionally
/// scoped to one company.
pub async fn fetch_interview_records(
    pool: &PgPool,
    since: DateTime<Utc>,
    company_id: Option<Uuid>,
) -> anyhow::Result<Vec<InterviewRecord>> {
    let behavioral = sqlx::query(
        r#"
        SELECT id, created_at, interview_status, interview_type
        FROM interview_analytics.behavioral_interviews
        WHERE created_at >= $1 AND ($2::uuid IS NULL OR company_id = $2)
        ORDER BY created_at
        "#,
    )
    .bind(since)
    .bind(company_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch behavioral interviews")?;

    let coding = sqlx::query(
        r#"
        SELECT id, created_at, interview_status
        FROM interview_analytics.coding_interviews
        WHERE created_at >= $1 AND ($2::uuid IS NULL OR company_id = $2)
        ORDER BY created_at
        "#,
    )
    .bind(since)
    .bind(company_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch coding interviews")?;

    let mut records = Vec::with_capacity(behavioral.len() + coding.len());

    for row in behavioral {
        let raw_type: Option<String> = row.get("interview_type");
        let interview_type = InterviewType::parse(raw_type.as_deref());
        if interview_type.is_none() && raw_type.is_some() {
            warn!(raw = ?raw_type, "unknown interview type, treating as behavioral");
        }
        let raw_status: Option<String> = row.get("interview_status");
        records.push(InterviewRecord::behavioral(
            row.get("id"),
            row.get("created_at"),
            InterviewStatus::parse(raw_status.as_deref()),
            interview_type,
        ));
    }

    for row in coding {
        let raw_status: Option<String> = row.get("interview_status");
        records.push(InterviewRecord::coding(
            row.get("id"),
            row.get("created_at"),
            InterviewStatus::parse(raw_status.as_deref()),
        ));
    }

    debug!(count = records.len(), %since, "fetched interview records");
    Ok(records)
}

pub async fn fetch_candidate_results(
    pool: &PgPool,
    company_id: Option<Uuid>,
) -> anyhow::Result<Vec<CandidateResult>> {
    let rows = sqlx::query(
        r#"
        SELECT id, interview_id, interview_type, candidate_name, candidate_email,
               accuracy, completion_rate, elapsed_seconds
        FROM interview_analytics.interview_results
        WHERE $1::uuid IS NULL OR company_id = $1
        "#,
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
    .context("failed to fetch interview results")?;

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        let raw_type: String = row.get("interview_type");
        results.push(CandidateResult {
            result_id: row.get("id"),
            interview_id: row.get("interview_id"),
            candidate_name: row.get("candidate_name"),
            candidate_email: row.get("candidate_email"),
            interview_type: InterviewType::parse(Some(&raw_type))
                .unwrap_or(InterviewType::Behavioral),
            accuracy: row.get("accuracy"),
            completion_rate: row.get("completion_rate"),
            elapsed_seconds: row.get("elapsed_seconds"),
        });
    }

    Ok(results)
}

/// Stores a reviewer decision and returns its id.
pub async fn record_approval(
    pool: &PgPool,
    result_id: Uuid,
    action: ApprovalAction,
    note: Option<&str>,
) -> anyhow::Result<Uuid> {
    let exists = sqlx::query("SELECT 1 FROM interview_analytics.interview_results WHERE id = $1")
        .bind(result_id)
        .fetch_optional(pool)
        .await?
        .is_some();
    if !exists {
        bail!("no interview result with id {result_id}");
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO interview_analytics.approval_actions (id, result_id, action, note)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(result_id)
    .bind(action.as_str())
    .bind(note)
    .execute(pool)
    .await
    .context("failed to record approval action")?;

    info!(%result_id, action = action.as_str(), "approval action recorded");
    Ok(id)
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    kind: String,
    candidate_email: String,
    interview_type: Option<String>,
    interview_status: Option<String>,
    created_at: DateTime<Utc>,
    source_key: Option<String>,
}

pub async fn import_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
    company_id: Uuid,
) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid CSV row {}", line + 1))?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = match row.kind.trim().to_ascii_lowercase().as_str() {
            "behavioral" => {
                sqlx::query(
                    r#"
                    INSERT INTO interview_analytics.behavioral_interviews
                    (id, company_id, candidate_email, interview_type, interview_status, created_at, source_key)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (source_key) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(company_id)
                .bind(&row.candidate_email)
                .bind(&row.interview_type)
                .bind(&row.interview_status)
                .bind(row.created_at)
                .bind(&source_key)
                .execute(pool)
                .await?
            }
            "coding" => {
                sqlx::query(
                    r#"
                    INSERT INTO interview_analytics.coding_interviews
                    (id, company_id, candidate_email, interview_status, created_at, source_key)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ON CONFLICT (source_key) DO NOTHING
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(company_id)
                .bind(&row.candidate_email)
                .bind(&row.interview_status)
                .bind(row.created_at)
                .bind(&source_key)
                .execute(pool)
                .await?
            }
            other => bail!("row {}: unknown interview kind '{other}'", line + 1),
        };

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}
