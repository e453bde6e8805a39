//! Sheet layouts as plain rows of cells, shared by every renderer.

use super::StudentReport;
use crate::classify::Department;
use crate::scoring::BucketScore;

pub type Row = Vec<String>;

pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// File name of a student's sheet: `<Last>_<First>_<id>.csv`, with anything
/// outside `[A-Za-z0-9-]` folded to `_`.
pub fn sheet_file_name(report: &StudentReport) -> String {
    let clean = |s: &str| -> String {
        s.trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    };
    format!(
        "{}_{}_{}.csv",
        clean(&report.student.last_name),
        clean(&report.student.first_name),
        report.student.id
    )
}

/// Course/Score column pairs for a group of departments, padded to the longest
/// bucket, closed by a per-department total row.
fn department_group(buckets: &[&BucketScore]) -> Vec<Row> {
    let mut rows = Vec::new();

    rows.push(
        buckets
            .iter()
            .flat_map(|b| [b.department.name().to_string(), "Score".to_string()])
            .collect(),
    );

    let depth = buckets.iter().map(|b| b.courses.len()).max().unwrap_or(0);
    for i in 0..depth {
        rows.push(
            buckets
                .iter()
                .flat_map(|b| match b.courses.get(i) {
                    Some(course) => [course.title.clone(), format_score(course.score)],
                    None => [String::new(), String::new()],
                })
                .collect(),
        );
    }

    rows.push(
        buckets
            .iter()
            .flat_map(|b| ["Total".to_string(), format_score(b.total)])
            .collect(),
    );
    rows
}

/// Rows of one student's sheet: identity, the first four departments side by
/// side, the remaining four, then the summary fields.
pub fn student_sheet_rows(report: &StudentReport) -> Vec<Row> {
    let student = &report.student;
    let mut rows: Vec<Row> = vec![
        vec!["Student".to_string(), student.display_name()],
        vec!["Student ID".to_string(), student.id.to_string()],
        vec![
            "Graduation Year".to_string(),
            student.grad_year.clone().unwrap_or_default(),
        ],
        Vec::new(),
    ];

    let buckets = &report.scored.departments;
    let split = Department::FIRST_GROUP.min(buckets.len());
    let (first, second) = buckets.split_at(split);

    rows.extend(department_group(&first.iter().collect::<Vec<_>>()));
    rows.push(Vec::new());
    rows.extend(department_group(&second.iter().collect::<Vec<_>>()));
    rows.push(Vec::new());

    let summary = &report.summary;
    rows.push(vec![
        "Curriculum Rating".to_string(),
        format_score(summary.curriculum_rating),
    ]);
    rows.push(vec!["Highest Math".to_string(), summary.highest_math_label()]);
    rows.push(vec![
        "Highest World Language".to_string(),
        summary.highest_world_language_label(),
    ]);
    rows.push(vec![
        "Additional Math".to_string(),
        summary.additional_math_label(),
    ]);
    rows
}

pub fn summary_header() -> Row {
    let mut header: Row = [
        "Student_ID",
        "First_Name",
        "Last_Name",
        "Email",
        "Graduation_Year",
        "Curriculum_Rating",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(Department::ALL.iter().map(|d| d.name().to_string()));
    header.extend(
        [
            "Highest_Math",
            "Highest_World_Language",
            "Additional_Math",
            "Student_Sheet",
            "Courses",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    header
}

/// One summary row; `sheet_link` points at the student's own sheet.
pub fn summary_row(report: &StudentReport, sheet_link: &str) -> Row {
    let student = &report.student;
    let summary = &report.summary;

    let mut row = vec![
        student.id.to_string(),
        student.first_name.clone(),
        student.last_name.clone(),
        student.email.clone().unwrap_or_default(),
        student.grad_year.clone().unwrap_or_default(),
        format_score(summary.curriculum_rating),
    ];
    row.extend(
        Department::ALL
            .iter()
            .map(|d| format_score(report.scored.total(*d))),
    );
    row.push(summary.highest_math_label());
    row.push(summary.highest_world_language_label());
    row.push(summary.additional_math_label());
    row.push(sheet_link.to_string());
    row.push(report.course_list());
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::report::tests::{enrollment, sample_record, student};
    use crate::scoring::ScoringEngine;
    use crate::sis::StudentEnrollments;

    fn report(record: &StudentEnrollments) -> StudentReport {
        StudentReport::build(record, &Classifier::default(), &ScoringEngine::default())
    }

    #[test]
    fn test_sheet_file_name() {
        let mut record = sample_record();
        record.student.last_name = "O'Neil Smith".to_string();
        assert_eq!(sheet_file_name(&report(&record)), "O_Neil_Smith_Avery_7.csv");
    }

    #[test]
    fn test_summary_row_matches_header() {
        let r = report(&sample_record());
        let header = summary_header();
        let row = summary_row(&r, "students/Lee_Avery_7.csv");
        assert_eq!(row.len(), header.len());

        let col = |name: &str| header.iter().position(|h| h == name).unwrap();
        assert_eq!(row[col("Student_ID")], "7");
        assert_eq!(row[col("Curriculum_Rating")], "2.0");
        assert_eq!(row[col("Math")], "1.0");
        assert_eq!(row[col("Literature")], "0.0");
        assert_eq!(row[col("Highest_Math")], "AP Calculus BC");
        assert_eq!(row[col("Highest_World_Language")], "None");
        assert_eq!(row[col("Student_Sheet")], "students/Lee_Avery_7.csv");
        assert_eq!(row[col("Courses")], "AP Calculus BC | Advisory | Physics (H)");
    }

    #[test]
    fn test_student_sheet_groups() {
        let record = StudentEnrollments {
            student: student(5, "Rae", "Kim"),
            enrollments: vec![
                enrollment(5, "Geometry", "Math", false),
                enrollment(5, "AP Calculus AB", "Math", false),
                enrollment(5, "Biology", "Science", false),
                enrollment(5, "Chorus", "Music", false),
            ],
        };
        let rows = student_sheet_rows(&report(&record));

        let first_header = vec![
            "Literature", "Score",
            "History/Social Science", "Score",
            "Math", "Score",
            "Science", "Score",
        ];
        let start = rows.iter().position(|r| r == &first_header).unwrap();
        // two Math courses -> two course rows, then totals
        assert_eq!(rows[start + 1][4], "Geometry");
        assert_eq!(rows[start + 1][6], "Biology");
        assert_eq!(rows[start + 2][4], "AP Calculus AB");
        assert_eq!(rows[start + 2][6], "");
        assert_eq!(rows[start + 3][0], "Total");
        assert_eq!(rows[start + 3][5], "1.0");

        let second = rows
            .iter()
            .position(|r| r.first().map(String::as_str) == Some("Computer Science and Engineering"))
            .unwrap();
        assert!(second > start + 3);
        assert_eq!(rows[second][4], "Fine Arts");
        assert_eq!(rows[second + 1][4], "Chorus");

        let last = rows.last().unwrap();
        assert_eq!(last[0], "Additional Math");
    }

    #[test]
    fn test_empty_student_sheet_still_has_both_groups() {
        let record = StudentEnrollments {
            student: student(6, "Lin", "Yu"),
            enrollments: vec![],
        };
        let rows = student_sheet_rows(&report(&record));
        let totals = rows.iter().filter(|r| r.first().map(String::as_str) == Some("Total")).count();
        assert_eq!(totals, 2);
    }
}
