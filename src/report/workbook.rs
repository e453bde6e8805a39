use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::layout::{sheet_file_name, student_sheet_rows, summary_header, summary_row, Row};
use super::{ReportRenderer, StudentReport};

pub const SUMMARY_FILE: &str = "summary.csv";
pub const STUDENTS_DIR: &str = "students";

/// Where a workbook rooted at `root` keeps this student's sheet.
pub fn student_sheet_path(root: &Path, report: &StudentReport) -> PathBuf {
    root.join(STUDENTS_DIR).join(sheet_file_name(report))
}

/// Writes the report as a directory of CSV sheets:
/// `summary.csv` plus `students/<Last>_<First>_<id>.csv`.
pub struct CsvWorkbook {
    root: PathBuf,
}

impl CsvWorkbook {
    /// Create the workbook directory (and its students/ subdirectory).
    pub fn create(root: &Path) -> Result<Self> {
        fs::create_dir_all(root.join(STUDENTS_DIR))
            .with_context(|| format!("Failed to create report directory {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }

    /// Link stored in the summary sheet, relative to the workbook root
    fn sheet_link(report: &StudentReport) -> String {
        format!("{}/{}", STUDENTS_DIR, sheet_file_name(report))
    }

    fn write_rows(path: &Path, rows: &[Row]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        for row in rows {
            writer
                .write_record(row)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl ReportRenderer for CsvWorkbook {
    fn render_student_sheet(&mut self, report: &StudentReport) -> Result<()> {
        let path = student_sheet_path(&self.root, report);
        Self::write_rows(&path, &student_sheet_rows(report))
    }

    fn render_summary_sheet(&mut self, reports: &[StudentReport]) -> Result<()> {
        let mut rows = Vec::with_capacity(reports.len() + 1);
        rows.push(summary_header());
        rows.extend(
            reports
                .iter()
                .map(|report| summary_row(report, &Self::sheet_link(report))),
        );
        Self::write_rows(&self.summary_path(), &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::report::render_all;
    use crate::report::tests::sample_record;
    use crate::scoring::ScoringEngine;
    use std::env;

    #[test]
    fn test_workbook_layout_on_disk() {
        let root = env::temp_dir().join("course_rigor_test_workbook");
        let _ = fs::remove_dir_all(&root);

        let report = StudentReport::build(
            &sample_record(),
            &Classifier::default(),
            &ScoringEngine::default(),
        );
        let mut workbook = CsvWorkbook::create(&root).unwrap();
        render_all(&mut workbook, std::slice::from_ref(&report)).unwrap();

        let sheet = root.join("students").join("Lee_Avery_7.csv");
        assert!(sheet.exists());
        assert_eq!(student_sheet_path(&root, &report), sheet);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(workbook.summary_path())
            .unwrap();
        let headers = reader.headers().unwrap().clone();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);

        let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
        assert_eq!(&records[0][col("Last_Name")], "Lee");
        assert_eq!(&records[0][col("Student_Sheet")], "students/Lee_Avery_7.csv");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_student_sheet_path_follows_root() {
        let report = StudentReport::build(
            &sample_record(),
            &Classifier::default(),
            &ScoringEngine::default(),
        );
        assert_eq!(
            student_sheet_path(Path::new("/tmp/elsewhere"), &report),
            PathBuf::from("/tmp/elsewhere/students/Lee_Avery_7.csv")
        );
    }

    #[test]
    fn test_student_sheet_is_ragged() {
        let root = env::temp_dir().join("course_rigor_test_workbook_ragged");
        let _ = fs::remove_dir_all(&root);

        let report = StudentReport::build(
            &sample_record(),
            &Classifier::default(),
            &ScoringEngine::default(),
        );
        let mut workbook = CsvWorkbook::create(&root).unwrap();
        workbook.render_student_sheet(&report).unwrap();

        let text = fs::read_to_string(root.join("students/Lee_Avery_7.csv")).unwrap();
        assert!(text.starts_with("Student,Avery Lee\n"));
        assert!(text.contains("Curriculum Rating,2.0"));

        let _ = fs::remove_dir_all(&root);
    }
}
