use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::department::Department;

/// Static classification tables.
///
/// Loaded once at startup and handed to the [`Classifier`](super::Classifier)
/// by value. Any table left out of the YAML keeps its built-in default.
///
/// Example YAML:
/// ```yaml
/// classification:
///   skip_courses: ["Advisory", "Study Hall"]
///   skip_course_prefixes: ["Homeroom"]
///   department_remap:
///     English: Literature
///   course_overrides:
///     AP Psychology: History/Social Science
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationConfig {
    /// Exact course titles that never reach a department
    pub skip_courses: Vec<String>,

    /// Title prefixes that never reach a department
    pub skip_course_prefixes: Vec<String>,

    /// Source department names whose courses are dropped outright
    pub skip_departments: Vec<String>,

    /// Canonical departments a course may land in; anything else becomes Other
    pub primary_departments: Vec<Department>,

    /// Source department name -> department name
    pub department_remap: BTreeMap<String, String>,

    /// Exact course title -> department name, checked before `department_remap`
    pub course_overrides: BTreeMap<String, String>,

    /// Titles that belong to History/Social Science when listed only under Humanities
    pub humanities_history_titles: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            skip_courses: strings(&[
                "Advisory",
                "Study Hall",
                "Assembly",
                "Community Meeting",
                "Free Period",
                "Lunch",
            ]),
            skip_course_prefixes: strings(&["Advisory ", "Homeroom", "Class Meeting", "Athletics"]),
            skip_departments: strings(&["Athletics", "Student Life", "Administration"]),
            primary_departments: Department::ALL.to_vec(),
            department_remap: table(&[
                ("English", "Literature"),
                ("History", "History/Social Science"),
                ("Social Studies", "History/Social Science"),
                ("Mathematics", "Math"),
                ("Computer Science", "Computer Science and Engineering"),
                ("Engineering", "Computer Science and Engineering"),
                ("Modern Languages", "World Languages"),
                ("Classics", "World Languages"),
                ("Arts", "Fine Arts"),
                ("Visual Arts", "Fine Arts"),
                ("Performing Arts", "Fine Arts"),
                ("Music", "Fine Arts"),
            ]),
            course_overrides: table(&[
                ("AP Psychology", "History/Social Science"),
                ("Engineering Physics", "Science"),
                ("Latin Literature", "World Languages"),
                ("Digital Photography", "Fine Arts"),
            ]),
            humanities_history_titles: strings(&["Global Perspectives", "Ethics & Society"]),
        }
    }
}

impl ClassificationConfig {
    pub fn is_skipped_title(&self, title: &str) -> bool {
        self.skip_courses.iter().any(|s| s == title)
            || self
                .skip_course_prefixes
                .iter()
                .any(|p| title.starts_with(p.as_str()))
    }

    pub fn is_skipped_department(&self, department: &str) -> bool {
        self.skip_departments.iter().any(|s| s == department)
    }

    pub fn is_primary(&self, department: Department) -> bool {
        self.primary_departments.contains(&department)
    }
}
