pub mod config;
pub mod engine;
pub mod strategy;
pub mod validation;

pub use config::*;
pub use engine::{BucketScore, CourseScore, ScoringEngine};
pub use strategy::{DepartmentScorer, FULL_CREDIT, HALF_CREDIT, NO_CREDIT};
pub use validation::validate_scoring;
