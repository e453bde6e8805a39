use super::config::{LookupConfig, ScoringConfig};

fn check_lookup(name: &str, lookup: &LookupConfig, errors: &mut Vec<String>) {
    for title in &lookup.full_credit {
        if lookup.half_credit.contains(title) {
            errors.push(format!(
                "scoring.{}: '{}' listed under both full_credit and half_credit",
                name, title
            ));
        }
    }
    for (i, title) in lookup
        .full_credit
        .iter()
        .chain(lookup.half_credit.iter())
        .enumerate()
    {
        if title.trim().is_empty() {
            errors.push(format!("scoring.{}: empty title at entry {}", name, i));
        }
    }
}

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, positional) in [("literature", &config.literature), ("history", &config.history)] {
        for (i, title) in positional.excluded.iter().enumerate() {
            if title.trim().is_empty() {
                errors.push(format!("scoring.{}.excluded[{}]: empty title", name, i));
            }
        }
    }

    check_lookup("math", &config.math, &mut errors);
    check_lookup("computer_science", &config.computer_science, &mut errors);

    for (i, title) in config.science.half_credit.iter().enumerate() {
        if title.contains(crate::classify::HONORS_MARKER) {
            errors.push(format!(
                "scoring.science.half_credit[{}]: '{}' is honors and already earns full credit",
                i, title
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
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_title_in_both_lists() {
        let mut config = ScoringConfig::default();
        config.math.half_credit.push("AP Calculus BC".to_string());
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.math"));
    }

    #[test]
    fn test_honors_science_half_credit() {
        let mut config = ScoringConfig::default();
        config.science.half_credit.push("Physics (H)".to_string());
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.science.half_credit[1]"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ScoringConfig::default();
        config.history.excluded.push(" ".to_string());
        config.computer_science.full_credit.push("".to_string());
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
