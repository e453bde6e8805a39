use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::credentials::obtain_access_token;
use crate::sis::{self, EnrollmentSnapshot, SisClient};

/// How `report` treats a stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotMode {
    /// Reuse a fresh snapshot, fetch otherwise
    Auto,
    /// Never touch the network
    Offline,
    /// Always fetch
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Stored,
    Fetch,
    Missing,
}

/// Decide whether a stored snapshot can serve this run.
pub fn choose_source(
    stored: Option<&EnrollmentSnapshot>,
    mode: SnapshotMode,
    max_age: Duration,
    school_years: &[String],
    now: DateTime<Utc>,
) -> SnapshotSource {
    match (mode, stored) {
        (SnapshotMode::Refresh, _) => SnapshotSource::Fetch,
        (SnapshotMode::Offline, Some(_)) => SnapshotSource::Stored,
        (SnapshotMode::Offline, None) => SnapshotSource::Missing,
        (SnapshotMode::Auto, Some(s)) if s.is_fresh(max_age, school_years, now) => SnapshotSource::Stored,
        (SnapshotMode::Auto, _) => SnapshotSource::Fetch,
    }
}

/// Authenticate, then pull the roster and every student's enrollments.
pub async fn fetch_snapshot(config: &Config) -> Result<EnrollmentSnapshot> {
    let token = obtain_access_token(&config.api).await?;
    let client = SisClient::new(&config.api, &token)?;

    let students = sis::fetch_student_roster(&client, &config.roster).await?;
    eprintln!("Found {} students", students.len());

    let records =
        sis::fetch_all_enrollments(&client, students, &config.roster.school_years).await?;
    Ok(EnrollmentSnapshot::new(
        config.roster.school_years.clone(),
        records,
    ))
}

/// Fetch and store a new snapshot.
pub async fn refresh_snapshot(config: &Config, path: &Path) -> Result<EnrollmentSnapshot> {
    let snapshot = fetch_snapshot(config).await?;
    sis::save_snapshot(path, &snapshot)?;
    tracing::info!(
        path = %path.display(),
        students = snapshot.students.len(),
        enrollments = snapshot.enrollment_count(),
        "Saved enrollment snapshot"
    );
    Ok(snapshot)
}

/// Snapshot for a report run: stored when allowed and fresh, fetched otherwise.
pub async fn load_or_fetch_snapshot(
    config: &Config,
    path: &Path,
    mode: SnapshotMode,
) -> Result<EnrollmentSnapshot> {
    let stored = match sis::load_snapshot(path) {
        Ok(s) => s,
        Err(e) if mode != SnapshotMode::Offline => {
            tracing::warn!("Ignoring unreadable snapshot: {:#}", e);
            None
        }
        Err(e) => return Err(e),
    };

    let max_age = config.cache.max_age()?;
    let now = Utc::now();
    match choose_source(stored.as_ref(), mode, max_age, &config.roster.school_years, now) {
        SnapshotSource::Stored => {
            let snapshot = stored.ok_or_else(|| anyhow::anyhow!("snapshot vanished"))?;
            eprintln!(
                "Using enrollments fetched {} ago ({} students)",
                crate::output::format_age(now - snapshot.fetched_at),
                snapshot.students.len()
            );
            Ok(snapshot)
        }
        SnapshotSource::Fetch => refresh_snapshot(config, path).await,
        SnapshotSource::Missing => anyhow::bail!(
            "No enrollment snapshot at {}. Run `course-rigor fetch` first",
            path.display()
        ),
    }
}
