use serde::{Deserialize, Serialize};

/// A student from the roster endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Student {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub grad_year: Option<String>,
}

impl Student {
    /// "First Last" for display
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// One enrollment row, already lifted out of the API's wire format.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Enrollment {
    pub student_id: u64,
    pub course_title: String,
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(default)]
    pub departments: Vec<String>,
    pub dropped: bool,
    pub school_year: String,
}

/// A student together with every enrollment fetched for them, newest school
/// year first.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StudentEnrollments {
    pub student: Student,
    #[serde(default)]
    pub enrollments: Vec<Enrollment>,
}

/// Paged list envelope shared by the SIS list endpoints.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(default)]
    pub next_link: Option<String>,
}

/// The SIS sends flags as either `0`/`1` or booleans.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    pub fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(n) => n != 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiDepartment {
    #[serde(default)]
    pub name: Option<String>,
}

/// Enrollment as returned by `v1/academics/enrollments/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnrollment {
    #[serde(default)]
    pub course_title: Option<String>,
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(default)]
    pub departments: Option<Vec<ApiDepartment>>,
    #[serde(default)]
    pub dropped: Option<Flag>,
}

impl ApiEnrollment {
    /// Convert to an [`Enrollment`]. Rows without a course title are dropped;
    /// a missing `dropped` flag counts as dropped.
    pub fn into_enrollment(self, student_id: u64, school_year: &str) -> Option<Enrollment> {
        let course_title = self.course_title.filter(|t| !t.trim().is_empty())?;
        let departments = self
            .departments
            .unwrap_or_default()
            .into_iter()
            .filter_map(|d| d.name)
            .collect();

        Some(Enrollment {
            student_id,
            course_title,
            block_name: self.block_name,
            departments,
            dropped: self.dropped.map_or(true, Flag::is_set),
            school_year: school_year.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enrollment_page() {
        let json = r#"{
            "count": 2,
            "value": [
                {
                    "course_title": "Chemistry (H)",
                    "block_name": "C Block",
                    "departments": [{"id": 4, "name": "Science"}],
                    "dropped": 0
                },
                {
                    "course_title": "Spanish III",
                    "block_name": null,
                    "dropped": true
                }
            ]
        }"#;
        let page: Page<ApiEnrollment> = serde_json::from_str(json).unwrap();
        assert!(page.next_link.is_none());

        let rows: Vec<Enrollment> = page
            .value
            .into_iter()
            .filter_map(|e| e.into_enrollment(42, "2025-2026"))
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].departments, vec!["Science".to_string()]);
        assert!(!rows[0].dropped);
        assert_eq!(rows[0].school_year, "2025-2026");
        assert!(rows[1].dropped);
        assert!(rows[1].departments.is_empty());
        assert!(rows[1].block_name.is_none());
    }

    #[test]
    fn test_missing_dropped_counts_as_dropped() {
        let json = r#"{"course_title": "Geometry"}"#;
        let api: ApiEnrollment = serde_json::from_str(json).unwrap();
        assert!(api.into_enrollment(1, "2024-2025").unwrap().dropped);
    }

    #[test]
    fn test_missing_title_is_discarded() {
        let json = r#"{"block_name": "A", "dropped": 0}"#;
        let api: ApiEnrollment = serde_json::from_str(json).unwrap();
        assert!(api.into_enrollment(1, "2024-2025").is_none());
    }

    #[test]
    fn test_parse_student_page() {
        let json = r#"{
            "value": [
                {"id": 7, "first_name": "Avery", "last_name": "Lee", "email": "avery@example.org", "grad_year": "2026"}
            ],
            "next_link": "https://api.sky.blackbaud.com/school/v1/users?page=2"
        }"#;
        let page: Page<Student> = serde_json::from_str(json).unwrap();
        assert_eq!(page.value[0].display_name(), "Avery Lee");
        assert!(page.next_link.is_some());
    }
}
