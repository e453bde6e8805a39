pub mod layout;
pub mod workbook;

pub use workbook::CsvWorkbook;

use anyhow::Result;
use std::cmp::Ordering;

use crate::classify::{Classifier, Diagnostic};
use crate::profile::{build_profile, score_profile, summarize, ScoredProfile, StudentCourseProfile, StudentSummary};
use crate::scoring::ScoringEngine;
use crate::sis::{Student, StudentEnrollments};

/// Placeholder for the course list of a student with no enrollments.
pub const NO_COURSES: &str = "No courses found";

/// Everything the renderers need about one student.
#[derive(Debug, Clone)]
pub struct StudentReport {
    pub student: Student,
    pub profile: StudentCourseProfile,
    pub scored: ScoredProfile,
    pub summary: StudentSummary,
    /// Every non-dropped title in fetch order, skipped ones included
    pub courses: Vec<String>,
    /// Titles the classifier skipped, in first-seen order
    pub skipped: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl StudentReport {
    /// Classify, bucket, score and summarize one student's enrollments.
    pub fn build(record: &StudentEnrollments, classifier: &Classifier, engine: &ScoringEngine) -> Self {
        let build = build_profile(classifier, &record.enrollments);
        let scored = score_profile(&build.profile, engine);
        let summary = summarize(&build.profile, &scored);

        let mut courses: Vec<String> = Vec::new();
        for enrollment in record.enrollments.iter().filter(|e| !e.dropped) {
            if !courses.contains(&enrollment.course_title) {
                courses.push(enrollment.course_title.clone());
            }
        }

        Self {
            student: record.student.clone(),
            profile: build.profile,
            scored,
            summary,
            courses,
            skipped: build.skipped,
            diagnostics: build.diagnostics,
        }
    }

    /// Courses joined with " | ", or the no-courses placeholder.
    pub fn course_list(&self) -> String {
        if self.courses.is_empty() {
            NO_COURSES.to_string()
        } else {
            self.courses.join(" | ")
        }
    }

    /// Log this student's classification findings.
    pub fn emit_diagnostics(&self) {
        let name = self.student.display_name();
        for diagnostic in &self.diagnostics {
            diagnostic.emit(&name);
        }
        if !self.skipped.is_empty() {
            tracing::debug!(student = %name, titles = ?self.skipped, "Skipped non-academic courses");
        }
    }
}

/// Build reports for every student, logging diagnostics as they appear.
pub fn build_reports(
    records: &[StudentEnrollments],
    classifier: &Classifier,
    engine: &ScoringEngine,
) -> Vec<StudentReport> {
    records
        .iter()
        .map(|record| {
            let report = StudentReport::build(record, classifier, engine);
            report.emit_diagnostics();
            report
        })
        .collect()
}

/// Highest curriculum rating first; ties by last then first name.
pub fn rank(reports: &mut [StudentReport]) {
    reports.sort_by(|a, b| {
        b.summary
            .curriculum_rating
            .partial_cmp(&a.summary.curriculum_rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.student.last_name.cmp(&b.student.last_name))
            .then_with(|| a.student.first_name.cmp(&b.student.first_name))
    });
}

/// A report output format.
pub trait ReportRenderer {
    fn render_student_sheet(&mut self, report: &StudentReport) -> Result<()>;
    fn render_summary_sheet(&mut self, reports: &[StudentReport]) -> Result<()>;
}

/// Render one sheet per student followed by the summary sheet.
pub fn render_all(renderer: &mut dyn ReportRenderer, reports: &[StudentReport]) -> Result<()> {
    for report in reports {
        renderer.render_student_sheet(report)?;
    }
    renderer.render_summary_sheet(reports)
}
