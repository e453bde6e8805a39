use std::collections::HashSet;

use super::{ClassifiedCourse, StudentCourseProfile};
use crate::classify::{Classifier, CourseRecord, Diagnostic, Outcome};
use crate::sis::Enrollment;

/// Everything the fold produced for one student.
#[derive(Debug, Clone, Default)]
pub struct ProfileBuild {
    pub profile: StudentCourseProfile,
    /// Titles dropped by the skip rules, in first-seen order
    pub skipped: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Folds a student's enrollments into a [`StudentCourseProfile`].
///
/// Classification is keyed by title and scoped to the student: the first
/// enrollment of a title decides its department, later ones are ignored.
pub struct ProfileBuilder<'a> {
    classifier: &'a Classifier,
    seen: HashSet<String>,
    build: ProfileBuild,
}

impl<'a> ProfileBuilder<'a> {
    pub fn new(classifier: &'a Classifier) -> Self {
        Self {
            classifier,
            seen: HashSet::new(),
            build: ProfileBuild::default(),
        }
    }

    pub fn push(&mut self, enrollment: &Enrollment) {
        if enrollment.dropped {
            return;
        }
        if !self.seen.insert(enrollment.course_title.clone()) {
            return;
        }

        let classification = self.classifier.classify(&CourseRecord {
            title: &enrollment.course_title,
            block_name: enrollment.block_name.as_deref(),
            departments: &enrollment.departments,
        });
        self.build.diagnostics.extend(classification.diagnostics);

        match classification.outcome {
            Outcome::Skip => self.build.skipped.push(enrollment.course_title.clone()),
            Outcome::Department(department) => self.build.profile.push(ClassifiedCourse {
                title: enrollment.course_title.clone(),
                department,
            }),
        }
    }

    pub fn finish(self) -> ProfileBuild {
        self.build
    }
}

/// Build a profile from enrollments in iteration order (newest school year first
/// by convention).
pub fn build_profile<'e, I>(classifier: &Classifier, enrollments: I) -> ProfileBuild
where
    I: IntoIterator<Item = &'e Enrollment>,
{
    let mut builder = ProfileBuilder::new(classifier);
    for enrollment in enrollments {
        builder.push(enrollment);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Department;

    fn enrollment(title: &str, block: &str, departments: &[&str], year: &str) -> Enrollment {
        Enrollment {
            student_id: 1,
            course_title: title.to_string(),
            block_name: Some(block.to_string()),
            departments: departments.iter().map(|s| s.to_string()).collect(),
            dropped: false,
            school_year: year.to_string(),
        }
    }

    #[test]
    fn test_duplicate_titles_across_years_counted_once() {
        let enrollments = vec![
            enrollment("Chemistry (H)", "A", &["Science"], "2025-2026"),
            enrollment("Chemistry (H)", "B", &["Science"], "2024-2025"),
        ];
        let build = build_profile(&Classifier::default(), &enrollments);
        assert_eq!(build.profile.titles(Department::Science), vec!["Chemistry (H)"]);
        assert_eq!(build.profile.course_count(), 1);
    }

    #[test]
    fn test_first_occurrence_decides_department() {
        let enrollments = vec![
            enrollment("Research Seminar", "AM Mtg", &["Science"], "2025-2026"),
            enrollment("Research Seminar", "C Block", &["Science"], "2024-2025"),
        ];
        let build = build_profile(&Classifier::default(), &enrollments);
        assert_eq!(build.profile.titles(Department::Other), vec!["Research Seminar"]);
        assert!(build.profile.titles(Department::Science).is_empty());
    }

    #[test]
    fn test_skipped_title_never_resurfaces() {
        let enrollments = vec![
            enrollment("Advisory", "AM Mtg", &["Student Life"], "2025-2026"),
            enrollment("Advisory", "A Block", &["Literature"], "2024-2025"),
            enrollment("Advisory", "B Block", &["Math"], "2023-2024"),
        ];
        let build = build_profile(&Classifier::default(), &enrollments);
        assert!(build.profile.is_empty());
        assert!(!build.profile.contains("Advisory"));
        assert_eq!(build.skipped, vec!["Advisory".to_string()]);
    }

    #[test]
    fn test_dropped_enrollment_does_not_claim_title() {
        let mut dropped = enrollment("Physics (H)", "E", &["Science"], "2025-2026");
        dropped.dropped = true;
        let enrollments = vec![
            dropped,
            enrollment("Physics (H)", "AM Mtg", &["Science"], "2024-2025"),
        ];
        let build = build_profile(&Classifier::default(), &enrollments);
        // the surviving enrollment is the one classified, block gate and all
        assert_eq!(build.profile.titles(Department::Other), vec!["Physics (H)"]);
        assert_eq!(build.diagnostics.len(), 1);
    }

    #[test]
    fn test_buckets_keep_enrollment_order() {
        let enrollments = vec![
            enrollment("Lit C", "A", &["Literature"], "2025-2026"),
            enrollment("Geometry", "B", &["Math"], "2025-2026"),
            enrollment("Lit A", "C", &["English"], "2024-2025"),
            enrollment("Eng9 Foundations", "D", &[], "2023-2024"),
        ];
        let build = build_profile(&Classifier::default(), &enrollments);
        assert_eq!(
            build.profile.titles(Department::Literature),
            vec!["Lit C", "Lit A", "Eng9 Foundations"]
        );
    }

    #[test]
    fn test_diagnostics_collected() {
        let enrollments = vec![
            enrollment("Big Questions", "A", &["Humanities"], "2025-2026"),
            enrollment("Big Questions", "A", &["Humanities"], "2024-2025"),
        ];
        let build = build_profile(&Classifier::default(), &enrollments);
        // classified once, so reported once
        assert_eq!(build.diagnostics.len(), 1);
        assert!(build.diagnostics[0].is_error());
    }
}
