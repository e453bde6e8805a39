use chrono::Duration;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::classify::{Classification, Department, Outcome};
use crate::report::layout::format_score;
use crate::report::StudentReport;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
pub fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Ranked table: index, rating, name, then highest math and world language.
/// No headers. The trailing detail column is truncated to the terminal width;
/// pipes (`width` None) get full lines.
pub fn format_ranked_table(reports: &[StudentReport], use_colors: bool, width: Option<usize>) -> String {
    if reports.is_empty() {
        return "No students found.".to_string();
    }

    let index_width = format!("{}.", reports.len()).len();
    let rating_width = 5;
    let name_width = reports
        .iter()
        .map(|r| r.student.display_name().chars().count())
        .max()
        .unwrap_or(0)
        .min(32);
    let separator = "  ";

    reports
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            let index_str = format!("{:>width$}", format!("{}.", idx + 1), width = index_width);
            let rating_str = format!(
                "{:>width$}",
                format_score(report.summary.curriculum_rating),
                width = rating_width
            );
            let name = truncate(&report.student.display_name(), name_width);
            let name_padded = format!("{:<width$}", name, width = name_width);

            let detail = format!(
                "Math: {}  Lang: {}",
                report.summary.highest_math_label(),
                report.summary.highest_world_language_label()
            );
            let fixed = index_width + 1 + rating_width + separator.len() * 2 + name_width;
            let detail = match width {
                Some(w) if w > fixed + 10 => truncate(&detail, w - fixed),
                Some(_) => truncate(&detail, 20),
                None => detail,
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    rating_str.bold(),
                    separator,
                    name_padded.cyan(),
                    separator,
                    detail
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, rating_str, separator, name_padded, separator, detail
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tab-separated rows for scripting:
/// id, last, first, rating, eight department totals, math, language, additional math.
pub fn format_tsv(reports: &[StudentReport]) -> String {
    reports
        .iter()
        .map(|report| {
            let mut cells = vec![
                report.student.id.to_string(),
                report.student.last_name.clone(),
                report.student.first_name.clone(),
                format_score(report.summary.curriculum_rating),
            ];
            cells.extend(
                Department::ALL
                    .iter()
                    .map(|d| format_score(report.scored.total(*d))),
            );
            cells.push(report.summary.highest_math_label());
            cells.push(report.summary.highest_world_language_label());
            cells.push(report.summary.additional_math_label());
            cells.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line explanation of a single classification.
pub fn format_explanation(title: &str, classification: &Classification, use_colors: bool) -> String {
    let outcome = match classification.outcome {
        Outcome::Department(department) => department.name().to_string(),
        Outcome::Skip => "skipped".to_string(),
    };

    let mut lines = if use_colors {
        vec![
            title.bold().to_string(),
            format!("  Department: {}", outcome.green()),
            format!("  Decided by: {}", classification.rule.yellow()),
        ]
    } else {
        vec![
            title.to_string(),
            format!("  Department: {}", outcome),
            format!("  Decided by: {}", classification.rule),
        ]
    };

    for diagnostic in &classification.diagnostics {
        let level = if diagnostic.is_error() { "error" } else { "warning" };
        if use_colors {
            let level = if diagnostic.is_error() {
                level.red().to_string()
            } else {
                level.yellow().to_string()
            };
            lines.push(format!("  {}: {}", level, diagnostic));
        } else {
            lines.push(format!("  {}: {}", level, diagnostic));
        }
    }
    lines.join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
