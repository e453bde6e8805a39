pub mod config;
pub mod department;
pub mod rules;
pub mod validation;

pub use config::ClassificationConfig;
pub use department::Department;
pub use rules::{CourseRecord, Diagnostic, Outcome, RuleId, RULES};
pub use validation::validate_classification;

/// Substring marking an honors section.
pub const HONORS_MARKER: &str = "(H)";

/// Full result of classifying one record: where it went, which rule decided,
/// and any findings worth logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub outcome: Outcome,
    pub rule: RuleId,
    pub diagnostics: Vec<Diagnostic>,
}

/// Maps raw enrollment fields to a canonical department.
///
/// Owns its tables; two classifiers built from different configs never share
/// state, so they can be used side by side (and across threads).
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassificationConfig,
}

impl Classifier {
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    /// Run [`RULES`] top-down and return the first decision.
    ///
    /// Total over its inputs: the final rule always decides, so every record
    /// ends up in a canonical department or `Skip`.
    pub fn classify(&self, record: &CourseRecord<'_>) -> Classification {
        for rule in RULES.iter() {
            if let Some(decision) = (rule.apply)(&self.config, record) {
                let mut diagnostics = decision.diagnostics;
                if decision.outcome == Outcome::Department(Department::Other)
                    && record.title.contains(HONORS_MARKER)
                {
                    diagnostics.push(Diagnostic::HonorsInOther {
                        title: record.title.to_string(),
                    });
                }
                return Classification {
                    outcome: decision.outcome,
                    rule: rule.id,
                    diagnostics,
                };
            }
        }

        // RULES ends with the department-list rule, which never falls through
        Classification {
            outcome: Outcome::Department(Department::Other),
            rule: RuleId::DepartmentList,
            diagnostics: Vec::new(),
        }
    }

    /// Convenience wrapper returning only the outcome.
    pub fn outcome(&self, title: &str, block_name: Option<&str>, departments: &[String]) -> Outcome {
        self.classify(&CourseRecord {
            title,
            block_name,
            departments,
        })
        .outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn classify(title: &str, block: Option<&str>, departments: &[&str]) -> Classification {
        let d = depts(departments);
        Classifier::default().classify(&CourseRecord {
            title,
            block_name: block,
            departments: &d,
        })
    }

    #[test]
    fn test_hist_prefix_beats_block_and_departments() {
        let result = classify("Hist2 Modern Europe", Some("C Block"), &[]);
        assert_eq!(
            result.outcome,
            Outcome::Department(Department::HistorySocialScience)
        );
        assert_eq!(result.rule, RuleId::ReservedPrefix);
    }

    #[test]
    fn test_hist_prefix_ignores_block_gate() {
        let result = classify("Hist3 Revolutions", Some("AM Mtg"), &["Science"]);
        assert_eq!(
            result.outcome,
            Outcome::Department(Department::HistorySocialScience)
        );
    }

    #[test]
    fn test_eng_prefix_is_literature() {
        let result = classify("Eng11 American Voices", None, &["Science"]);
        assert_eq!(result.outcome, Outcome::Department(Department::Literature));
    }

    #[test]
    fn test_teachers_assistant_is_other() {
        let result = classify("Teacher's Assistant - Chemistry", Some("B Block"), &["Science"]);
        assert_eq!(result.outcome, Outcome::Department(Department::Other));
        assert_eq!(result.rule, RuleId::ReservedPrefix);
    }

    #[test]
    fn test_humanities_alone_reports_inconsistency() {
        let result = classify("Ideas That Shaped Us", Some("D Block"), &["Humanities"]);
        assert_eq!(result.outcome, Outcome::Department(Department::Other));
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::InconsistentHumanities {
                title: "Ideas That Shaped Us".to_string()
            }]
        );
        assert!(result.diagnostics[0].is_error());
    }

    #[test]
    fn test_block_gate_beats_department_list() {
        let result = classify("Math Lab", Some("AM Mtg"), &["Math"]);
        assert_eq!(result.outcome, Outcome::Department(Department::Other));
        assert_eq!(result.rule, RuleId::BlockGate);
    }

    #[test]
    fn test_skip_list_beats_reserved_prefix() {
        let config = ClassificationConfig {
            skip_course_prefixes: vec!["Hist".to_string()],
            ..ClassificationConfig::default()
        };
        let d = depts(&[]);
        let result = Classifier::new(config).classify(&CourseRecord {
            title: "Hist2 Modern Europe",
            block_name: Some("C"),
            departments: &d,
        });
        assert_eq!(result.outcome, Outcome::Skip);
        assert_eq!(result.rule, RuleId::SkipList);
    }

    #[test]
    fn test_advisory_is_skipped() {
        let result = classify("Advisory", Some("AM Mtg"), &["Student Life"]);
        assert_eq!(result.outcome, Outcome::Skip);
    }

    #[test]
    fn test_no_departments_is_other() {
        let result = classify("Capstone Project", Some("F Block"), &[]);
        assert_eq!(result.outcome, Outcome::Department(Department::Other));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_honors_in_other_warns_without_changing_outcome() {
        let result = classify("Independent Research (H)", Some("Independent"), &["Science"]);
        assert_eq!(result.outcome, Outcome::Department(Department::Other));
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::HonorsInOther {
                title: "Independent Research (H)".to_string()
            }]
        );
    }

    #[test]
    fn test_honors_in_department_does_not_warn() {
        let result = classify("Chemistry (H)", Some("A Block"), &["Science"]);
        assert_eq!(result.outcome, Outcome::Department(Department::Science));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = Classifier::default();
        let cases: Vec<(&str, Option<&str>, Vec<String>)> = vec![
            ("Hist2 Modern Europe", Some("C Block"), depts(&[])),
            ("Spanish IV (H)", Some("B"), depts(&["World Languages"])),
            ("Ideas", Some("D"), depts(&["Humanities"])),
            ("Robotics", None, depts(&["Engineering"])),
        ];
        for (title, block, d) in &cases {
            let first = classifier.outcome(title, *block, d);
            let second = classifier.outcome(title, *block, d);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_classification_is_total() {
        let classifier = Classifier::default();
        let titles = ["", "(H)", "Hist", "Eng9", "Advisory", "x"];
        let blocks = [None, Some(""), Some("A"), Some("zz"), Some("AM Mtg")];
        let lists = [
            depts(&[]),
            depts(&["Humanities"]),
            depts(&["Humanities", "Nonsense"]),
            depts(&["Math"]),
            depts(&["Athletics"]),
        ];
        for title in titles {
            for block in blocks {
                for list in &lists {
                    match classifier.outcome(title, block, list) {
                        Outcome::Skip => {}
                        Outcome::Department(d) => assert!(Department::ALL.contains(&d)),
                    }
                }
            }
        }
    }

    #[test]
    fn test_classifiers_with_different_configs_are_independent() {
        let strict = Classifier::new(ClassificationConfig {
            skip_courses: vec!["Geometry".to_string()],
            ..ClassificationConfig::default()
        });
        let lenient = Classifier::default();
        let d = depts(&["Math"]);
        assert_eq!(strict.outcome("Geometry", Some("A"), &d), Outcome::Skip);
        assert_eq!(
            lenient.outcome("Geometry", Some("A"), &d),
            Outcome::Department(Department::Math)
        );
    }
}
