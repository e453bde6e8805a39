use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{
    get_config_path, validate_config, ApiConfig, CacheConfig, Config, OutputConfig, RosterConfig,
};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    read_answer(&mut std::io::stdin().lock())
}

/// Read one trimmed line. A closed input is an error, so retry loops end.
fn read_answer(reader: &mut impl BufRead) -> Result<String> {
    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .context("Failed to read input")?;
    if read == 0 {
        anyhow::bail!("stdin closed before the wizard finished");
    }
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

fn prompt_required(message: &str) -> Result<String> {
    loop {
        let value = prompt(message)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("  A value is required.");
    }
}

fn prompt_year(message: &str, default: u32) -> Result<u32> {
    loop {
        let input = prompt_with_default(message, &default.to_string())?;
        match input.parse::<u32>() {
            Ok(year) if (1900..=2200).contains(&year) => return Ok(year),
            _ => println!("  Invalid: enter a four-digit year. Try again."),
        }
    }
}

/// Split "2025-2026, 2024-2025" into school years, newest first as typed.
fn parse_school_years(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Course Rigor Configuration Wizard");
    println!("=================================");
    println!();

    // 1. SKY API application
    println!("Register an application in the Blackbaud developer portal, then");
    println!("copy its application ID and your subscription key here.");
    let api_defaults = ApiConfig::default();
    let client_id = prompt_required("Application (client) ID: ")?;
    let subscription_key = prompt_required("Subscription key: ")?;
    let redirect_uri = prompt_with_default("Redirect URI", &api_defaults.redirect_uri)?;
    println!("The client secret is requested on first run and kept in the system keyring.");

    // 2. Roster
    println!();
    let roster_defaults = RosterConfig::default();
    let grad_year_start = prompt_year("First graduation year", roster_defaults.grad_year_start)?;
    let grad_year_end = prompt_year("Last graduation year", roster_defaults.grad_year_end.max(grad_year_start))?;
    let role_id = prompt("Student role id (blank for none): ")?;
    let school_years = loop {
        let input = prompt_with_default(
            "School years, newest first",
            &roster_defaults.school_years.join(", "),
        )?;
        let years = parse_school_years(&input);
        if years.is_empty() {
            println!("  At least one school year is required.");
        } else {
            break years;
        }
    };

    // 3. Output
    println!();
    let output_defaults = OutputConfig::default();
    let directory = prompt_with_default(
        "Report directory",
        &output_defaults.directory.display().to_string(),
    )?;
    let cache_defaults = CacheConfig::default();
    let max_age = loop {
        let input = prompt_with_default("Reuse fetched enrollments for", &cache_defaults.max_age)?;
        match humantime::parse_duration(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid duration: {}. Try again.", e),
        }
    };

    let config = Config {
        api: ApiConfig {
            client_id,
            subscription_key,
            redirect_uri,
            ..api_defaults
        },
        roster: RosterConfig {
            grad_year_start,
            grad_year_end,
            role_id: if role_id.is_empty() { None } else { Some(role_id) },
            school_years,
        },
        output: OutputConfig {
            directory: PathBuf::from(directory),
        },
        cache: CacheConfig { max_age },
        classification: None,
        scoring: None,
    };

    if let Err(errors) = validate_config(&config) {
        println!();
        println!("The configuration has problems:");
        for error in &errors {
            println!("  - {}", error);
        }
        if !prompt_yes_no("Save it anyway?", false)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Classification and scoring tables use built-in defaults; add `classification:`");
    println!("or `scoring:` sections to the file to override them.");
    println!("Run `course-rigor report` to get started.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_answer_trims_line() {
        let mut input = std::io::Cursor::new("  abc \nnext\n");
        assert_eq!(read_answer(&mut input).unwrap(), "abc");
        assert_eq!(read_answer(&mut input).unwrap(), "next");
    }

    #[test]
    fn test_read_answer_blank_line_is_empty() {
        let mut input = std::io::Cursor::new("\n");
        assert_eq!(read_answer(&mut input).unwrap(), "");
    }

    #[test]
    fn test_read_answer_errors_on_closed_input() {
        let mut input = std::io::Cursor::new("");
        let err = read_answer(&mut input).unwrap_err();
        assert!(err.to_string().contains("stdin closed"));
    }

    #[test]
    fn test_parse_school_years() {
        assert_eq!(
            parse_school_years("2025-2026, 2024-2025,,  2023-2024 "),
            vec!["2025-2026", "2024-2025", "2023-2024"]
        );
        assert!(parse_school_years(" , ").is_empty());
    }

    #[test]
    fn test_wizard_output_roundtrips_through_yaml() {
        let config = Config {
            api: ApiConfig {
                client_id: "id".to_string(),
                subscription_key: "key".to_string(),
                ..ApiConfig::default()
            },
            roster: RosterConfig::default(),
            output: OutputConfig::default(),
            cache: CacheConfig::default(),
            classification: None,
            scoring: None,
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
