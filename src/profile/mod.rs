pub mod builder;
pub mod levels;
pub mod summary;

pub use builder::{build_profile, ProfileBuild, ProfileBuilder};
pub use levels::LanguageLevel;
pub use summary::{score_profile, summarize, ScoredProfile, StudentSummary};

use std::collections::BTreeMap;

use crate::classify::Department;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCourse {
    pub title: String,
    pub department: Department,
}

/// A department's courses in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentBucket {
    pub department: Department,
    pub courses: Vec<ClassifiedCourse>,
}

impl DepartmentBucket {
    pub fn new(department: Department) -> Self {
        Self {
            department,
            courses: Vec::new(),
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.courses.iter().map(|c| c.title.as_str()).collect()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.courses.iter().any(|c| c.title == title)
    }
}

/// Every classified course of one student, bucketed by department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentCourseProfile {
    buckets: BTreeMap<Department, DepartmentBucket>,
}

impl StudentCourseProfile {
    pub(crate) fn push(&mut self, course: ClassifiedCourse) {
        self.buckets
            .entry(course.department)
            .or_insert_with(|| DepartmentBucket::new(course.department))
            .courses
            .push(course);
    }

    pub fn bucket(&self, department: Department) -> Option<&DepartmentBucket> {
        self.buckets.get(&department)
    }

    /// Titles of a department in bucket order; empty when the department has none.
    pub fn titles(&self, department: Department) -> Vec<&str> {
        self.bucket(department)
            .map(DepartmentBucket::titles)
            .unwrap_or_default()
    }

    /// Non-empty buckets in canonical department order.
    pub fn buckets(&self) -> impl Iterator<Item = &DepartmentBucket> {
        self.buckets.values()
    }

    pub fn course_count(&self) -> usize {
        self.buckets.values().map(|b| b.courses.len()).sum()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.buckets.values().any(|b| b.contains(title))
    }

    pub fn is_empty(&self) -> bool {
        self.course_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, department: Department) -> ClassifiedCourse {
        ClassifiedCourse {
            title: title.to_string(),
            department,
        }
    }

    #[test]
    fn test_buckets_iterate_in_canonical_order() {
        let mut profile = StudentCourseProfile::default();
        profile.push(course("Chorus", Department::FineArts));
        profile.push(course("Geometry", Department::Math));
        profile.push(course("US Literature", Department::Literature));

        let order: Vec<Department> = profile.buckets().map(|b| b.department).collect();
        assert_eq!(
            order,
            vec![Department::Literature, Department::Math, Department::FineArts]
        );
    }

    #[test]
    fn test_bucket_keeps_insertion_order() {
        let mut profile = StudentCourseProfile::default();
        profile.push(course("Zoology", Department::Science));
        profile.push(course("Astronomy", Department::Science));
        assert_eq!(profile.titles(Department::Science), vec!["Zoology", "Astronomy"]);
        assert!(profile.titles(Department::Math).is_empty());
        assert_eq!(profile.course_count(), 2);
        assert!(profile.contains("Astronomy"));
    }
}
