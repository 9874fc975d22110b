use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::catalog::School;
use crate::explain::Explanation;
use crate::ranking::Comparable;
use crate::scoring::{ComputationResult, Label};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a probability as a percentage with one decimal ("8.5%")
pub fn format_probability(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Format a dollar amount with thousands separators ("$35,000")
pub fn format_currency(amount: f64) -> String {
    let whole = amount.max(0.0).round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${}", grouped)
}

fn format_label(label: Label, use_colors: bool) -> String {
    if !use_colors {
        return label.to_string();
    }
    match label {
        Label::Reach => label.red().bold().to_string(),
        Label::Match => label.yellow().bold().to_string(),
        Label::Likely => label.green().bold().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Detailed estimate for one school: probability, label, reasons,
/// sub-scores and the net price estimate.
pub fn format_chance(
    school: &School,
    result: &ComputationResult,
    net_price: f64,
    use_colors: bool,
) -> String {
    let b = &result.breakdown;
    let heading = format!("{} (#{} {})", school.name, school.rank, school.school_type);
    let probability = format_probability(result.probability);

    let mut lines = Vec::new();
    if use_colors {
        lines.push(heading.bold().to_string());
        lines.push(format!(
            "  Chance: {}  {}",
            probability.bold(),
            format_label(result.label, true)
        ));
    } else {
        lines.push(heading);
        lines.push(format!("  Chance: {}  {}", probability, result.label));
    }

    lines.push(format!(
        "  Acceptance rate: {}  GPA: {}  SAT: {}  ACT: {}",
        format_probability(b.base_rate),
        school.gpa.display(2),
        school.sat.display(0),
        school.act.display(0)
    ));
    lines.push(format!(
        "  Academics: {:.2}  Holistic: {:.2}  Major fit: {:.2}  Overall: {:.2}",
        b.academics, b.holistic, b.major_fit, b.overall
    ));
    lines.push(format!("  Estimated net price: {}", format_currency(net_price)));

    if !result.reasons.is_empty() {
        lines.push(String::new());
        lines.push("  Why:".to_string());
        for reason in &result.reasons {
            lines.push(format!("  - {}", reason));
        }
    }

    lines.join("\n")
}

/// Comparable schools, one per line: index, probability, label, distance, name
pub fn format_comparables_table(comparables: &[Comparable], use_colors: bool) -> String {
    if comparables.is_empty() {
        return "No comparable schools found.".to_string();
    }

    let term_width = get_terminal_width();

    // "99." + space, "100.0%" right-aligned in 6, label in 6, "±99.9%" in 7
    let index_width = 3;
    let prob_width = 6;
    let label_width = 6;
    let delta_width = 7;
    let separator = "  ";
    let fixed_width = index_width + 1 + prob_width + label_width + delta_width + separator.len() * 3;

    comparables
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let index_str = format!("{:>2}.", idx + 1);
            let prob_str = format!(
                "{:>width$}",
                format_probability(c.result.probability),
                width = prob_width
            );
            let label_str = format!("{:<width$}", c.result.label.as_str(), width = label_width);
            let delta_str = format!(
                "{:>width$}",
                format!("±{}", format_probability(c.distance)),
                width = delta_width
            );

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&c.school.name, width - fixed_width),
                Some(_) => truncate_name(&c.school.name, 20),
                None => c.school.name.clone(),
            };

            if use_colors {
                let label_colored = match c.result.label {
                    Label::Reach => label_str.red().to_string(),
                    Label::Match => label_str.yellow().to_string(),
                    Label::Likely => label_str.green().to_string(),
                };
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    prob_str.bold(),
                    separator,
                    label_colored,
                    separator,
                    delta_str.dimmed(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, prob_str, separator, label_str, separator, delta_str, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Catalog listing: rank, type, acceptance rate, name
pub fn format_school_list<'a>(schools: impl IntoIterator<Item = &'a School>, use_colors: bool) -> String {
    let lines: Vec<String> = schools
        .into_iter()
        .map(|s| {
            let rank = format!("#{:<4}", s.rank);
            let kind = format!("{:<8}", s.school_type.as_str());
            let rate = format!("{:>6}", format_probability(s.acceptance_rate));
            if use_colors {
                format!("{} {} {}  {}", rank.dimmed(), kind.cyan(), rate, s.name.bold())
            } else {
                format!("{} {} {}  {}", rank, kind, rate, s.name)
            }
        })
        .collect();

    if lines.is_empty() {
        "No schools found.".to_string()
    } else {
        lines.join("\n")
    }
}

/// Render a narrative explanation. Raw replies are shown as-is.
pub fn format_explanation(explanation: &Explanation, use_colors: bool) -> String {
    match explanation {
        Explanation::Parsed(report) => {
            let mut lines = Vec::new();
            if use_colors {
                lines.push(report.headline.bold().to_string());
            } else {
                lines.push(report.headline.clone());
            }
            lines.push(String::new());
            lines.push(report.summary.clone());

            let sections = [
                ("Reasons", &report.reasons),
                ("Improvements", &report.improvements),
                ("Spike ideas", &report.spike_ideas),
            ];
            for (title, items) in sections {
                if items.is_empty() {
                    continue;
                }
                lines.push(String::new());
                if use_colors {
                    lines.push(format!("{}:", title.underline()));
                } else {
                    lines.push(format!("{}:", title));
                }
                for item in items {
                    lines.push(format!("  - {}", item));
                }
            }
            lines.join("\n")
        }
        Explanation::RawFallback(text) => text.clone(),
        Explanation::Failed(reason) => {
            let message = format!("Explanation unavailable: {}", reason);
            if use_colors {
                message.yellow().to_string()
            } else {
                message
            }
        }
    }
}
