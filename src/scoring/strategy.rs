use super::config::{LookupConfig, PositionalConfig, ScienceConfig};
use crate::classify::HONORS_MARKER;

pub const FULL_CREDIT: f64 = 1.0;
pub const HALF_CREDIT: f64 = 0.5;
pub const NO_CREDIT: f64 = 0.0;

/// Scores one course of a department given where it sits among the
/// department's courses.
///
/// `position` is the 0-based index of `title` in `ordered`, which holds every
/// course of the department in first-seen order.
pub trait DepartmentScorer: Send + Sync {
    fn score(&self, title: &str, position: usize, ordered: &[&str]) -> f64;
}

/// Extra courses beyond a baseline earn half credit.
///
/// Excluded titles score nothing and are not counted. A counted course scores
/// half credit once more than `free_courses` counted courses sit at or before it.
#[derive(Debug, Clone)]
pub struct PositionalScorer {
    excluded: Vec<String>,
    free_courses: usize,
}

impl PositionalScorer {
    pub fn new(config: &PositionalConfig) -> Self {
        Self {
            excluded: config.excluded.clone(),
            free_courses: config.free_courses,
        }
    }

    fn is_excluded(&self, title: &str) -> bool {
        self.excluded.iter().any(|e| e == title)
    }
}

impl DepartmentScorer for PositionalScorer {
    fn score(&self, title: &str, position: usize, ordered: &[&str]) -> f64 {
        if self.is_excluded(title) {
            return NO_CREDIT;
        }
        let end = (position + 1).min(ordered.len());
        let counted = ordered[..end]
            .iter()
            .filter(|t| !self.is_excluded(t))
            .count();
        if counted > self.free_courses {
            HALF_CREDIT
        } else {
            NO_CREDIT
        }
    }
}

/// Fixed title lists, position independent.
#[derive(Debug, Clone)]
pub struct LookupScorer {
    full_credit: Vec<String>,
    half_credit: Vec<String>,
}

impl LookupScorer {
    pub fn new(config: &LookupConfig) -> Self {
        Self {
            full_credit: config.full_credit.clone(),
            half_credit: config.half_credit.clone(),
        }
    }
}

impl DepartmentScorer for LookupScorer {
    fn score(&self, title: &str, _position: usize, _ordered: &[&str]) -> f64 {
        if self.full_credit.iter().any(|t| t == title) {
            FULL_CREDIT
        } else if self.half_credit.iter().any(|t| t == title) {
            HALF_CREDIT
        } else {
            NO_CREDIT
        }
    }
}

/// Honors sections earn full credit; a few named courses earn half.
#[derive(Debug, Clone)]
pub struct ScienceScorer {
    half_credit: Vec<String>,
}

impl ScienceScorer {
    pub fn new(config: &ScienceConfig) -> Self {
        Self {
            half_credit: config.half_credit.clone(),
        }
    }
}

impl DepartmentScorer for ScienceScorer {
    fn score(&self, title: &str, _position: usize, _ordered: &[&str]) -> f64 {
        if title.contains(HONORS_MARKER) {
            FULL_CREDIT
        } else if self.half_credit.iter().any(|t| t == title) {
            HALF_CREDIT
        } else {
            NO_CREDIT
        }
    }
}

/// Upper-level language courses, keyed on the level in the title.
#[derive(Debug, Clone, Default)]
pub struct WorldLanguageScorer;

impl DepartmentScorer for WorldLanguageScorer {
    fn score(&self, title: &str, _position: usize, _ordered: &[&str]) -> f64 {
        if title.contains("IV (H)") || title.contains("V (H)") {
            FULL_CREDIT
        } else if title.contains("III (H)")
            || (title.contains(" IV") && !title.contains(HONORS_MARKER))
        {
            HALF_CREDIT
        } else {
            NO_CREDIT
        }
    }
}

/// Departments with no rigor rule yet.
#[derive(Debug, Clone, Default)]
pub struct ZeroScorer;

impl DepartmentScorer for ZeroScorer {
    fn score(&self, _title: &str, _position: usize, _ordered: &[&str]) -> f64 {
        NO_CREDIT
    }
}
