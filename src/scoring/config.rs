use serde::{Deserialize, Serialize};

/// Course lists behind the department scoring strategies.
///
/// The scoring mechanisms are fixed; only the named courses they look at can
/// be tuned from the config file.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   literature:
///     excluded: ["US Literature", "World Literature"]
///     free_courses: 4
///   math:
///     full_credit: ["AP Calculus AB", "AP Calculus BC"]
///     half_credit: ["AP Statistics"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub literature: PositionalConfig,
    pub history: PositionalConfig,
    pub math: LookupConfig,
    pub computer_science: LookupConfig,
    pub science: ScienceConfig,
}

/// "First N courses are baseline" rule.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PositionalConfig {
    /// Survey courses that always score 0 and do not count toward `free_courses`
    pub excluded: Vec<String>,

    /// How many counted courses are expected before extras earn credit
    pub free_courses: usize,
}

/// Fixed title lookup.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    #[serde(default)]
    pub full_credit: Vec<String>,
    #[serde(default)]
    pub half_credit: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScienceConfig {
    /// Non-honors titles worth half credit
    #[serde(default)]
    pub half_credit: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            literature: PositionalConfig {
                excluded: strings(&["US Literature", "World Literature"]),
                free_courses: 4,
            },
            history: PositionalConfig {
                excluded: strings(&["US History", "World History"]),
                free_courses: 2,
            },
            math: LookupConfig {
                full_credit: strings(&[
                    "AP Calculus AB",
                    "AP Calculus BC",
                    "Multivariable Calculus",
                    "Linear Algebra",
                    "Differential Equations",
                ]),
                half_credit: strings(&["Calculus", "Precalculus (H)", "AP Statistics"]),
            },
            computer_science: LookupConfig {
                full_credit: strings(&["AP Computer Science A", "Data Structures & Algorithms"]),
                half_credit: strings(&[
                    "AP Computer Science Principles",
                    "Robotics Engineering",
                    "Web Development",
                ]),
            },
            science: ScienceConfig {
                half_credit: strings(&["Anatomy & Physiology"]),
            },
        }
    }
}
