use std::fmt;

use super::config::ClassificationConfig;
use super::department::Department;

/// Title prefix reserved for student assistant placements.
pub const TEACHERS_ASSISTANT_PREFIX: &str = "Teacher's Assistant";

/// Department name that defers to the next listed department.
pub const HUMANITIES: &str = "Humanities";

/// The raw fields of an enrollment the classifier looks at.
#[derive(Debug, Clone, Copy)]
pub struct CourseRecord<'a> {
    pub title: &'a str,
    pub block_name: Option<&'a str>,
    pub departments: &'a [String],
}

/// Where a course ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Department(Department),
    Skip,
}

/// Identifies a classification rule; declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    SkipList,
    ReservedPrefix,
    BlockGate,
    DepartmentList,
}

impl RuleId {
    pub fn name(&self) -> &'static str {
        match self {
            RuleId::SkipList => "skip-list",
            RuleId::ReservedPrefix => "reserved-prefix",
            RuleId::BlockGate => "block-gate",
            RuleId::DepartmentList => "department-list",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-fatal findings raised while classifying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Listed only under Humanities with no second department to defer to
    InconsistentHumanities { title: String },
    /// Honors-marked title that still landed in Other
    HonorsInOther { title: String },
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        matches!(self, Diagnostic::InconsistentHumanities { .. })
    }

    /// Log through `tracing` at the level matching the finding.
    pub fn emit(&self, student: &str) {
        if self.is_error() {
            tracing::error!(student, "{}", self);
        } else {
            tracing::warn!(student, "{}", self);
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InconsistentHumanities { title } => write!(
                f,
                "'{}' is listed only under {} with no secondary department; classified as Other",
                title, HUMANITIES
            ),
            Diagnostic::HonorsInOther { title } => {
                write!(f, "honors course '{}' classified as Other", title)
            }
        }
    }
}

/// Result of the first rule that matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub outcome: Outcome,
    pub diagnostics: Vec<Diagnostic>,
}

impl Decision {
    fn to(outcome: Outcome) -> Self {
        Self {
            outcome,
            diagnostics: Vec::new(),
        }
    }

    fn department(department: Department) -> Self {
        Self::to(Outcome::Department(department))
    }
}

/// A predicate -> outcome rule. Returns `None` to fall through to the next rule.
pub struct Rule {
    pub id: RuleId,
    pub apply: fn(&ClassificationConfig, &CourseRecord<'_>) -> Option<Decision>,
}

/// Classification rules in priority order. The last rule always decides.
pub const RULES: [Rule; 4] = [
    Rule {
        id: RuleId::SkipList,
        apply: skip_list,
    },
    Rule {
        id: RuleId::ReservedPrefix,
        apply: reserved_prefix,
    },
    Rule {
        id: RuleId::BlockGate,
        apply: block_gate,
    },
    Rule {
        id: RuleId::DepartmentList,
        apply: department_list,
    },
];

fn skip_list(config: &ClassificationConfig, record: &CourseRecord<'_>) -> Option<Decision> {
    let skipped_department = record
        .departments
        .first()
        .is_some_and(|d| config.is_skipped_department(d));

    if config.is_skipped_title(record.title) || skipped_department {
        Some(Decision::to(Outcome::Skip))
    } else {
        None
    }
}

/// True when `title` is `prefix` immediately followed by a digit (e.g. "Hist2 ...").
fn has_numbered_prefix(title: &str, prefix: &str) -> bool {
    title
        .strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

fn reserved_prefix(_config: &ClassificationConfig, record: &CourseRecord<'_>) -> Option<Decision> {
    if record.title.starts_with(TEACHERS_ASSISTANT_PREFIX) {
        Some(Decision::department(Department::Other))
    } else if has_numbered_prefix(record.title, "Hist") {
        Some(Decision::department(Department::HistorySocialScience))
    } else if has_numbered_prefix(record.title, "Eng") {
        Some(Decision::department(Department::Literature))
    } else {
        None
    }
}

/// True when some token of the block label is a block letter A-G, optionally
/// followed by digits ("C Block", "B2", "Block-E"). "AM Mtg" has none.
pub fn has_block_letter(block_name: &str) -> bool {
    block_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| {
            let mut chars = token.chars();
            matches!(chars.next(), Some('A'..='G')) && chars.all(|c| c.is_ascii_digit())
        })
}

fn block_gate(_config: &ClassificationConfig, record: &CourseRecord<'_>) -> Option<Decision> {
    match record.block_name {
        Some(block) if has_block_letter(block) => None,
        _ => Some(Decision::department(Department::Other)),
    }
}

fn department_list(config: &ClassificationConfig, record: &CourseRecord<'_>) -> Option<Decision> {
    let mut diagnostics = Vec::new();

    let chosen: Option<&str> = match record.departments.first().map(String::as_str) {
        None => None,
        Some(HUMANITIES) => match record.departments.get(1) {
            Some(secondary) => Some(secondary.as_str()),
            None if config
                .humanities_history_titles
                .iter()
                .any(|t| t == record.title) =>
            {
                Some(Department::HistorySocialScience.name())
            }
            None => {
                diagnostics.push(Diagnostic::InconsistentHumanities {
                    title: record.title.to_string(),
                });
                None
            }
        },
        Some(first) => Some(first),
    };

    let remapped = remap(config, record.title, chosen);
    Some(Decision {
        outcome: Outcome::Department(canonicalize(config, remapped)),
        diagnostics,
    })
}

/// Course-title overrides first, then department-name remapping.
fn remap<'a>(
    config: &'a ClassificationConfig,
    title: &str,
    department: Option<&'a str>,
) -> Option<&'a str> {
    if let Some(target) = config.course_overrides.get(title) {
        return Some(target.as_str());
    }
    department.map(|d| {
        config
            .department_remap
            .get(d)
            .map(String::as_str)
            .unwrap_or(d)
    })
}

fn canonicalize(config: &ClassificationConfig, department: Option<&str>) -> Department {
    department
        .and_then(Department::from_name)
        .filter(|d| config.is_primary(*d))
        .unwrap_or(Department::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<'a>(title: &'a str, block: Option<&'a str>, depts: &'a [String]) -> CourseRecord<'a> {
        CourseRecord {
            title,
            block_name: block,
            departments: depts,
        }
    }

    fn depts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rules_are_in_priority_order() {
        let ids: Vec<RuleId> = RULES.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.first(), Some(&RuleId::SkipList));
        assert_eq!(ids.last(), Some(&RuleId::DepartmentList));
    }

    #[test]
    fn test_block_letter_detection() {
        assert!(has_block_letter("C Block"));
        assert!(has_block_letter("A"));
        assert!(has_block_letter("Block G"));
        assert!(has_block_letter("B2"));
        assert!(has_block_letter("Block-E"));
        assert!(!has_block_letter("AM Mtg"));
        assert!(!has_block_letter("Independent Study"));
        assert!(!has_block_letter("H Block"));
        assert!(!has_block_letter("c block"));
        assert!(!has_block_letter(""));
    }

    #[test]
    fn test_numbered_prefix() {
        assert!(has_numbered_prefix("Hist2 Modern Europe", "Hist"));
        assert!(!has_numbered_prefix("History of Art", "Hist"));
        assert!(!has_numbered_prefix("Hist", "Hist"));
        assert!(has_numbered_prefix("Eng10 Rhetoric", "Eng"));
        assert!(!has_numbered_prefix("Engineering Design", "Eng"));
    }

    #[test]
    fn test_skip_department_uses_first_listed() {
        let config = ClassificationConfig::default();
        let d = depts(&["Athletics", "Science"]);
        let decision = skip_list(&config, &record("Varsity Soccer", Some("A"), &d));
        assert_eq!(decision.map(|d| d.outcome), Some(Outcome::Skip));

        let d = depts(&["Science", "Athletics"]);
        assert!(skip_list(&config, &record("Sports Medicine", Some("A"), &d)).is_none());
    }

    #[test]
    fn test_block_gate_missing_block_is_other() {
        let config = ClassificationConfig::default();
        let d = depts(&["Math"]);
        let decision = block_gate(&config, &record("Geometry", None, &d)).unwrap();
        assert_eq!(decision.outcome, Outcome::Department(Department::Other));
    }

    #[test]
    fn test_department_list_remaps_source_name() {
        let config = ClassificationConfig::default();
        let d = depts(&["English"]);
        let decision = department_list(&config, &record("American Voices", Some("B"), &d)).unwrap();
        assert_eq!(decision.outcome, Outcome::Department(Department::Literature));
    }

    #[test]
    fn test_course_override_beats_department_remap() {
        let config = ClassificationConfig::default();
        let d = depts(&["Science"]);
        let decision = department_list(&config, &record("AP Psychology", Some("B"), &d)).unwrap();
        assert_eq!(
            decision.outcome,
            Outcome::Department(Department::HistorySocialScience)
        );
    }

    #[test]
    fn test_unknown_department_becomes_other() {
        let config = ClassificationConfig::default();
        let d = depts(&["Wellness"]);
        let decision = department_list(&config, &record("Health", Some("D"), &d)).unwrap();
        assert_eq!(decision.outcome, Outcome::Department(Department::Other));
        assert!(decision.diagnostics.is_empty());
    }

    #[test]
    fn test_non_primary_department_becomes_other() {
        let config = ClassificationConfig {
            primary_departments: vec![Department::Literature, Department::Other],
            ..ClassificationConfig::default()
        };
        let d = depts(&["Math"]);
        let decision = department_list(&config, &record("Geometry", Some("D"), &d)).unwrap();
        assert_eq!(decision.outcome, Outcome::Department(Department::Other));
    }

    #[test]
    fn test_humanities_defers_to_second_department() {
        let config = ClassificationConfig::default();
        let d = depts(&["Humanities", "Literature"]);
        let decision = department_list(&config, &record("Myth and Story", Some("E"), &d)).unwrap();
        assert_eq!(decision.outcome, Outcome::Department(Department::Literature));
        assert!(decision.diagnostics.is_empty());
    }

    #[test]
    fn test_humanities_special_title_is_history() {
        let config = ClassificationConfig::default();
        let d = depts(&["Humanities"]);
        let decision =
            department_list(&config, &record("Global Perspectives", Some("E"), &d)).unwrap();
        assert_eq!(
            decision.outcome,
            Outcome::Department(Department::HistorySocialScience)
        );
        assert!(decision.diagnostics.is_empty());
    }

    #[test]
    fn test_diagnostic_levels() {
        let inconsistent = Diagnostic::InconsistentHumanities {
            title: "X".to_string(),
        };
        let honors = Diagnostic::HonorsInOther {
            title: "X (H)".to_string(),
        };
        assert!(inconsistent.is_error());
        assert!(!honors.is_error());
        assert!(honors.to_string().contains("X (H)"));
    }
}
