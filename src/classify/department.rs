use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical department a course is classified into.
///
/// Variant order is the display and iteration order used by every report,
/// so `Ord` is derived from declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Literature")]
    Literature,
    #[serde(rename = "History/Social Science")]
    HistorySocialScience,
    #[serde(rename = "Math")]
    Math,
    #[serde(rename = "Science")]
    Science,
    #[serde(rename = "Computer Science and Engineering")]
    ComputerScienceEngineering,
    #[serde(rename = "World Languages")]
    WorldLanguages,
    #[serde(rename = "Fine Arts")]
    FineArts,
    #[serde(rename = "Other")]
    Other,
}

impl Department {
    /// All canonical departments in display order.
    pub const ALL: [Department; 8] = [
        Department::Literature,
        Department::HistorySocialScience,
        Department::Math,
        Department::Science,
        Department::ComputerScienceEngineering,
        Department::WorldLanguages,
        Department::FineArts,
        Department::Other,
    ];

    /// Departments laid out in the first group of a student sheet.
    pub const FIRST_GROUP: usize = 4;

    pub fn name(&self) -> &'static str {
        match self {
            Department::Literature => "Literature",
            Department::HistorySocialScience => "History/Social Science",
            Department::Math => "Math",
            Department::Science => "Science",
            Department::ComputerScienceEngineering => "Computer Science and Engineering",
            Department::WorldLanguages => "World Languages",
            Department::FineArts => "Fine Arts",
            Department::Other => "Other",
        }
    }

    /// Look up a canonical department by its exact display name.
    pub fn from_name(name: &str) -> Option<Department> {
        Department::ALL.iter().copied().find(|d| d.name() == name)
    }

    /// Position in the canonical order (0-based).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
