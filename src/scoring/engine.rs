use std::collections::BTreeMap;

use super::config::ScoringConfig;
use super::strategy::{
    DepartmentScorer, LookupScorer, PositionalScorer, ScienceScorer, WorldLanguageScorer,
    ZeroScorer, NO_CREDIT,
};
use crate::classify::Department;

#[derive(Debug, Clone, PartialEq)]
pub struct CourseScore {
    pub title: String,
    pub score: f64,
}

/// Scores for one department's courses, in bucket order.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketScore {
    pub department: Department,
    pub courses: Vec<CourseScore>,
    pub total: f64,
}

/// Department -> scoring strategy dispatch.
pub struct ScoringEngine {
    scorers: BTreeMap<Department, Box<dyn DepartmentScorer>>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl ScoringEngine {
    pub fn new(config: &ScoringConfig) -> Self {
        let mut scorers: BTreeMap<Department, Box<dyn DepartmentScorer>> = BTreeMap::new();
        scorers.insert(
            Department::Literature,
            Box::new(PositionalScorer::new(&config.literature)),
        );
        scorers.insert(
            Department::HistorySocialScience,
            Box::new(PositionalScorer::new(&config.history)),
        );
        scorers.insert(Department::Math, Box::new(LookupScorer::new(&config.math)));
        scorers.insert(
            Department::Science,
            Box::new(ScienceScorer::new(&config.science)),
        );
        scorers.insert(
            Department::ComputerScienceEngineering,
            Box::new(LookupScorer::new(&config.computer_science)),
        );
        scorers.insert(Department::WorldLanguages, Box::new(WorldLanguageScorer));
        scorers.insert(Department::FineArts, Box::new(ZeroScorer));
        scorers.insert(Department::Other, Box::new(ZeroScorer));
        Self { scorers }
    }

    /// Replace the strategy for one department.
    pub fn with_scorer(mut self, department: Department, scorer: Box<dyn DepartmentScorer>) -> Self {
        self.scorers.insert(department, scorer);
        self
    }

    /// Score a single course. Never negative; departments without a strategy score 0.
    pub fn score(&self, department: Department, title: &str, position: usize, ordered: &[&str]) -> f64 {
        self.scorers
            .get(&department)
            .map(|s| s.score(title, position, ordered))
            .unwrap_or(NO_CREDIT)
            .max(NO_CREDIT)
    }

    /// Score every course of a department bucket, keeping bucket order.
    pub fn score_bucket(&self, department: Department, titles: &[&str]) -> BucketScore {
        let courses: Vec<CourseScore> = titles
            .iter()
            .enumerate()
            .map(|(position, title)| CourseScore {
                title: title.to_string(),
                score: self.score(department, title, position, titles),
            })
            .collect();
        let total = courses.iter().map(|c| c.score).sum();

        BucketScore {
            department,
            courses,
            total,
        }
    }
}
