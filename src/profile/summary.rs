use super::levels::LanguageLevel;
use super::StudentCourseProfile;
use crate::classify::Department;
use crate::scoring::{BucketScore, ScoringEngine};

/// Math courses from most to least advanced.
pub const MATH_HIERARCHY: [&str; 13] = [
    "Differential Equations",
    "Linear Algebra",
    "Multivariable Calculus",
    "AP Calculus BC",
    "AP Calculus AB",
    "Calculus",
    "Precalculus (H)",
    "Precalculus",
    "Algebra II (H)",
    "Algebra II",
    "Geometry (H)",
    "Geometry",
    "Algebra I",
];

/// Substrings flagged as additional math coursework.
pub const ADDITIONAL_MATH: [&str; 2] = ["Statistics", "Financial Math"];

pub const NONE_LABEL: &str = "None";

/// Per-department scores for every canonical department, in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProfile {
    pub departments: Vec<BucketScore>,
    pub curriculum_rating: f64,
}

impl ScoredProfile {
    pub fn department(&self, department: Department) -> Option<&BucketScore> {
        self.departments.iter().find(|b| b.department == department)
    }

    pub fn total(&self, department: Department) -> f64 {
        self.department(department).map_or(0.0, |b| b.total)
    }
}

/// Score every department bucket. Departments with no courses still appear,
/// empty, so renderers can lay out a fixed grid.
pub fn score_profile(profile: &StudentCourseProfile, engine: &ScoringEngine) -> ScoredProfile {
    let departments: Vec<BucketScore> = Department::ALL
        .iter()
        .map(|dept| engine.score_bucket(*dept, &profile.titles(*dept)))
        .collect();
    let curriculum_rating = departments.iter().map(|b| b.total).sum();

    ScoredProfile {
        departments,
        curriculum_rating,
    }
}

/// Student-level view handed to the report layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSummary {
    pub curriculum_rating: f64,
    pub highest_math: Option<String>,
    pub highest_world_language: Option<LanguageLevel>,
    pub additional_math: Vec<String>,
}

impl StudentSummary {
    pub fn highest_math_label(&self) -> String {
        self.highest_math
            .clone()
            .unwrap_or_else(|| NONE_LABEL.to_string())
    }

    pub fn highest_world_language_label(&self) -> String {
        self.highest_world_language
            .map(|l| l.label().to_string())
            .unwrap_or_else(|| NONE_LABEL.to_string())
    }

    pub fn additional_math_label(&self) -> String {
        if self.additional_math.is_empty() {
            NONE_LABEL.to_string()
        } else {
            self.additional_math.join(", ")
        }
    }
}

pub fn highest_math(profile: &StudentCourseProfile) -> Option<String> {
    let bucket = profile.bucket(Department::Math)?;
    MATH_HIERARCHY
        .iter()
        .find(|course| bucket.contains(course))
        .map(|course| course.to_string())
}

pub fn additional_math(profile: &StudentCourseProfile) -> Vec<String> {
    let titles = profile.titles(Department::Math);
    ADDITIONAL_MATH
        .iter()
        .filter(|flag| titles.iter().any(|t| t.contains(*flag)))
        .map(|flag| flag.to_string())
        .collect()
}

pub fn summarize(profile: &StudentCourseProfile, scored: &ScoredProfile) -> StudentSummary {
    StudentSummary {
        curriculum_rating: scored.curriculum_rating,
        highest_math: highest_math(profile),
        highest_world_language: LanguageLevel::highest(profile.titles(Department::WorldLanguages)),
        additional_math: additional_math(profile),
    }
}
