use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::types::StudentEnrollments;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything one `fetch` pulled from the SIS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentSnapshot {
    pub version: u32,
    pub fetched_at: DateTime<Utc>,
    /// School years requested, newest first
    pub school_years: Vec<String>,
    pub students: Vec<StudentEnrollments>,
}

impl EnrollmentSnapshot {
    pub fn new(school_years: Vec<String>, students: Vec<StudentEnrollments>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            fetched_at: Utc::now(),
            school_years,
            students,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.fetched_at).to_std().unwrap_or(Duration::ZERO)
    }

    /// True when the snapshot is younger than `max_age` and was taken for the
    /// same school years.
    pub fn is_fresh(&self, max_age: Duration, school_years: &[String], now: DateTime<Utc>) -> bool {
        self.school_years == school_years && self.age(now) < max_age
    }

    pub fn enrollment_count(&self) -> usize {
        self.students.iter().map(|s| s.enrollments.len()).sum()
    }
}

/// Default snapshot location (~/.cache/course-rigor/enrollments.json)
pub fn get_snapshot_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("course-rigor"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/course-rigor",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
        .join("enrollments.json")
}

/// Load a snapshot. A missing file is `Ok(None)`.
pub fn load_snapshot(path: &Path) -> Result<Option<EnrollmentSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open enrollment snapshot at {}", path.display()))?;
    let snapshot: EnrollmentSnapshot =
        serde_json::from_reader(file).context("Failed to load enrollment snapshot")?;

    if snapshot.version != SNAPSHOT_VERSION {
        anyhow::bail!("Unsupported enrollment snapshot version: {}", snapshot.version);
    }

    Ok(Some(snapshot))
}

/// Save a snapshot atomically, creating the parent directory if needed.
pub fn save_snapshot(path: &Path, snapshot: &EnrollmentSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    serde_json::to_writer(&mut file, snapshot).context("Failed to serialize enrollment snapshot")?;
    file.commit().context("Failed to save enrollment snapshot")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sis::{Enrollment, Student};
    use std::env;

    fn years() -> Vec<String> {
        vec!["2025-2026".to_string(), "2024-2025".to_string()]
    }

    fn sample() -> EnrollmentSnapshot {
        let student = Student {
            id: 11,
            first_name: "Rowan".to_string(),
            last_name: "Park".to_string(),
            email: None,
            grad_year: Some("2026".to_string()),
        };
        let enrollment = Enrollment {
            student_id: 11,
            course_title: "Biology".to_string(),
            block_name: Some("B Block".to_string()),
            departments: vec!["Science".to_string()],
            dropped: false,
            school_year: "2025-2026".to_string(),
        };
        EnrollmentSnapshot::new(
            years(),
            vec![StudentEnrollments {
                student,
                enrollments: vec![enrollment],
            }],
        )
    }

    #[test]
    fn test_load_missing_file() {
        let path = env::temp_dir().join("course_rigor_test_snapshot_missing.json");
        let _ = std::fs::remove_file(&path);
        assert!(load_snapshot(&path).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let path = env::temp_dir()
            .join("course_rigor_test_snapshot")
            .join("enrollments.json");
        let _ = std::fs::remove_file(&path);

        let snapshot = sample();
        save_snapshot(&path, &snapshot).unwrap();
        let loaded = load_snapshot(&path).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.enrollment_count(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let path = env::temp_dir().join("course_rigor_test_snapshot_version.json");
        let mut snapshot = sample();
        snapshot.version = 99;
        save_snapshot(&path, &snapshot).unwrap();

        let err = load_snapshot(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_freshness() {
        let snapshot = sample();
        let day = Duration::from_secs(86_400);
        let now = snapshot.fetched_at + chrono::Duration::hours(2);
        assert!(snapshot.is_fresh(day, &years(), now));

        let later = snapshot.fetched_at + chrono::Duration::hours(25);
        assert!(!snapshot.is_fresh(day, &years(), later));

        // different year selection always refetches
        assert!(!snapshot.is_fresh(day, &["2025-2026".to_string()], now));
    }
}
