use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, TimeZone, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use uuid::Uuid;

mod analytics;
mod config;
mod db;
mod error;
mod models;
mod report;
mod scoring;
mod telemetry;

use analytics::TrendSnapshot;
use config::AppConfig;
use models::{ApprovalAction, TimeWindow};

#[derive(Parser)]
#[command(name = "interview-analytics")]
#[command(about = "Interview scoring and trend analytics for hiring teams", long_about = None)]
struct Cli {
    /// Company to scope queries to (overrides INTERVIEW_COMPANY_ID)
    #[arg(long, global = true)]
    company: Option<Uuid>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import interview records from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Rank candidates by composite score
    Rank {
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Show interview trends for a window
    Trends {
        /// week, month or quarter; anything else means week
        #[arg(long, default_value = "week")]
        window: String,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "week")]
        window: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Record a reviewer decision on a candidate result
    Decide {
        #[arg(long)]
        result: Uuid,
        #[arg(long, value_enum)]
        action: ApprovalAction,
        #[arg(long)]
        note: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("failed to connect to Postgres")?;

    let company_id = cli.company.or(config.company_id);
    let max_seconds = config.scoring.max_seconds;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted for company {}.", db::DEMO_COMPANY_ID);
        }
        Commands::Import { csv } => {
            let company_id = company_id
                .context("importing needs a company: pass --company or set INTERVIEW_COMPANY_ID")?;
            let inserted = db::import_csv(&pool, &csv, company_id).await?;
            println!("Inserted {inserted} interviews from {}.", csv.display());
        }
        Commands::Rank { limit, json } => {
            let results = db::fetch_candidate_results(&pool, company_id).await?;
            let mut scores = scoring::rank_candidates(&results, max_seconds);
            scores.truncate(limit);

            if json {
                println!("{}", serde_json::to_string_pretty(&scores)?);
                return Ok(());
            }

            if scores.is_empty() {
                println!("No graded results found.");
                return Ok(());
            }

            println!("Top candidates by composite score:");
            for score in &scores {
                println!(
                    "- {} ({}, {}) score {:.1}% (accuracy {:.1}, time {:.1}%, completion {:.0}%, rating {:.1}/5)",
                    score.candidate_name,
                    score.candidate_email,
                    score.interview_type.label(),
                    score.composite,
                    score.metrics.accuracy,
                    score.metrics.time_efficiency,
                    score.metrics.completion_rate,
                    score.metrics.average_rating
                );
            }
        }
        Commands::Trends { window, json } => {
            let trends = load_trends(&pool, &window, company_id).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&trends)?);
                return Ok(());
            }

            println!(
                "{} interviews since {} ({}):",
                trends.total_interviews(),
                trends.start,
                trends.window
            );
            for day in &trends.days {
                println!(
                    "  {}  behavioral {:>3}  coding {:>3}",
                    day.date, day.behavioral_count, day.coding_count
                );
            }
            for (title, buckets, suffix) in [
                ("By status", &trends.statuses, ""),
                ("By type", &trends.types, ""),
                ("Completion rate", &trends.completion_rates, "%"),
            ] {
                let line: Vec<String> = buckets
                    .iter()
                    .map(|bucket| format!("{} {}{}", bucket.label, bucket.value, suffix))
                    .collect();
                println!("{title}: {}", line.join(", "));
            }
        }
        Commands::Report { window, limit, out } => {
            let trends = load_trends(&pool, &window, company_id).await?;
            let results = db::fetch_candidate_results(&pool, company_id).await?;
            let scores = scoring::rank_candidates(&results, max_seconds);
            let scope = company_id.map(|id| id.to_string());
            let report = report::build_report(scope.as_deref(), &trends, &scores, limit);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Decide {
            result,
            action,
            note,
        } => {
            let id = db::record_approval(&pool, result, action, note.as_deref()).await?;
            println!("Recorded {} for result {result} ({id}).", action.as_str());
        }
    }

    Ok(())
}

async fn load_trends(
    pool: &sqlx::PgPool,
    window: &str,
    company_id: Option<Uuid>,
) -> anyhow::Result<TrendSnapshot> {
    let window = TimeWindow::from_param(window);
    let today = Local::now().date_naive();
    let start = analytics::window_start(window, today);
    let midnight = start
        .and_hms_opt(0, 0, 0)
        .context("invalid window start")?;
    let since = Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|moment| moment.with_timezone(&Utc))
        .context("window start does not exist in the local timezone")?;

    info!(%window, %since, "loading interview trends");
    let records = db::fetch_interview_records(pool, since, company_id).await?;
    Ok(TrendSnapshot::build(&records, window, today))
}
