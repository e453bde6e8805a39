use super::config::ClassificationConfig;
use super::department::Department;

/// Validate classification tables at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_classification(config: &ClassificationConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (i, prefix) in config.skip_course_prefixes.iter().enumerate() {
        if prefix.trim().is_empty() {
            errors.push(format!(
                "classification.skip_course_prefixes[{}]: empty prefix would skip every course",
                i
            ));
        }
    }

    for (i, title) in config.skip_courses.iter().enumerate() {
        if title.trim().is_empty() {
            errors.push(format!("classification.skip_courses[{}]: empty title", i));
        }
    }

    if !config.primary_departments.contains(&Department::Other) {
        errors.push("classification.primary_departments: must include Other".to_string());
    }

    let mut seen = Vec::new();
    for dept in &config.primary_departments {
        if seen.contains(dept) {
            errors.push(format!(
                "classification.primary_departments: '{}' listed more than once",
                dept
            ));
        }
        seen.push(*dept);
    }

    for (source, target) in &config.department_remap {
        if Department::from_name(target).is_none() {
            errors.push(format!(
                "classification.department_remap['{}']: unknown department '{}'",
                source, target
            ));
        }
    }

    for (title, target) in &config.course_overrides {
        if Department::from_name(target).is_none() {
            errors.push(format!(
                "classification.course_overrides['{}']: unknown department '{}'",
                title, target
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_classification(&ClassificationConfig::default()).is_ok());
    }

    #[test]
    fn test_unknown_remap_target() {
        let mut config = ClassificationConfig::default();
        config
            .department_remap
            .insert("English".to_string(), "Literatur".to_string());
        let errors = validate_classification(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("department_remap['English']"));
    }

    #[test]
    fn test_unknown_override_target() {
        let mut config = ClassificationConfig::default();
        config
            .course_overrides
            .insert("Debate".to_string(), "Speech".to_string());
        let errors = validate_classification(&config).unwrap_err();
        assert!(errors[0].contains("course_overrides['Debate']"));
    }

    #[test]
    fn test_primary_departments_need_other() {
        let config = ClassificationConfig {
            primary_departments: vec![Department::Math],
            ..ClassificationConfig::default()
        };
        let errors = validate_classification(&config).unwrap_err();
        assert!(errors[0].contains("must include Other"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ClassificationConfig {
            skip_course_prefixes: vec!["".to_string()],
            primary_departments: vec![Department::Math, Department::Math],
            ..ClassificationConfig::default()
        };
        let errors = validate_classification(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
