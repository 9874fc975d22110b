use std::sync::OnceLock;

use regex::Regex;

use super::parser::RawRecord;
use super::types::{Range, School, SchoolId, SchoolType};

pub const COL_RANK: &str = "Rank";
pub const COL_UNIVERSITY: &str = "University";
pub const COL_TYPE: &str = "Type";
pub const COL_GPA_RANGE: &str = "GPA_Range";
pub const COL_SAT_RANGE: &str = "SAT_Range";
pub const COL_ACT_RANGE: &str = "ACT_Range";
pub const COL_ACCEPTANCE_RATE: &str = "Acceptance_Rate";
pub const COL_AVERAGE_AID: &str = "Average_Aid";
pub const COL_EARLY_DECISION: &str = "Early_Decision";
pub const COL_EARLY_ACTION: &str = "Early_Action";
pub const COL_APPLICATION_FEE: &str = "Application_Fee";
pub const COL_NEED_BLIND: &str = "Need_Blind";
pub const COL_MERIT_AID: &str = "Merit_Aid";
pub const COL_SPECIAL_PROGRAMS: &str = "Special_Programs";
pub const COL_NOTABLE_STRENGTHS: &str = "Notable_Strengths";

pub const DEFAULT_ACCEPTANCE_RATE: f64 = 0.20;
pub const MIN_ACCEPTANCE_RATE: f64 = 0.005;
pub const MAX_ACCEPTANCE_RATE: f64 = 0.95;

fn range_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)\s*[-\x{2013}\x{2014}]\s*(\d+(?:\.\d+)?)")
            .expect("range pattern is valid")
    })
}

/// Parse a "low-high" field such as "3.70-4.00". Anything without two
/// numbers yields an unknown range.
pub fn parse_range(raw: &str) -> Range {
    let Some(caps) = range_pattern().captures(raw) else {
        return Range::unknown();
    };
    match (caps[1].parse::<f64>(), caps[2].parse::<f64>()) {
        (Ok(low), Ok(high)) => Range::new(low, high),
        _ => Range::unknown(),
    }
}

/// Positive integer rank, falling back to the row's 1-based position.
pub fn parse_rank(raw: &str, row_index: usize) -> u32 {
    raw.trim()
        .trim_start_matches('#')
        .parse::<u32>()
        .ok()
        .filter(|rank| *rank > 0)
        .unwrap_or(row_index as u32 + 1)
}

/// Acceptance rate as a fraction within [0.005, 0.95].
///
/// "7%" and bare values above 1 are read as percentages. Unparseable input
/// falls back to 0.20.
pub fn parse_acceptance_rate(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let (number, is_percent) = match trimmed.strip_suffix('%') {
        Some(n) => (n.trim(), true),
        None => (trimmed, false),
    };

    let rate = match number.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => {
            if is_percent || value > 1.0 {
                value / 100.0
            } else {
                value
            }
        }
        _ => DEFAULT_ACCEPTANCE_RATE,
    };

    rate.clamp(MIN_ACCEPTANCE_RATE, MAX_ACCEPTANCE_RATE)
}

/// Dollar amount with optional "$" and thousands separators. Defaults to 0.
pub fn parse_currency(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.max(0.0))
        .unwrap_or(0.0)
}

pub fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("yes")
}

/// Turn a raw record into a typed school. Never fails; every field has a
/// default. Eligibility is not checked here.
pub fn normalize_record(record: &RawRecord, row_index: usize) -> School {
    School {
        id: SchoolId(row_index),
        name: record.field(COL_UNIVERSITY).to_string(),
        rank: parse_rank(record.field(COL_RANK), row_index),
        school_type: SchoolType::parse(record.field(COL_TYPE)),
        gpa: parse_range(record.field(COL_GPA_RANGE)),
        sat: parse_range(record.field(COL_SAT_RANGE)),
        act: parse_range(record.field(COL_ACT_RANGE)),
        acceptance_rate: parse_acceptance_rate(record.field(COL_ACCEPTANCE_RATE)),
        average_aid: parse_currency(record.field(COL_AVERAGE_AID)),
        early_decision: parse_flag(record.field(COL_EARLY_DECISION)),
        early_action: parse_flag(record.field(COL_EARLY_ACTION)),
        need_blind: parse_flag(record.field(COL_NEED_BLIND)),
        application_fee: parse_currency(record.field(COL_APPLICATION_FEE)),
        merit_aid: record.field(COL_MERIT_AID).to_string(),
        special_programs: record.field(COL_SPECIAL_PROGRAMS).to_string(),
        notable_strengths: record.field(COL_NOTABLE_STRENGTHS).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parser::parse_records;

    #[test]
    fn test_parse_range_decimal() {
        assert_eq!(parse_range("3.70-4.00"), Range::new(3.7, 4.0));
    }

    #[test]
    fn test_parse_range_integer_with_spaces() {
        assert_eq!(parse_range("1400 - 1550"), Range::new(1400.0, 1550.0));
    }

    #[test]
    fn test_parse_range_en_dash() {
        assert_eq!(parse_range("33\u{2013}35"), Range::new(33.0, 35.0));
    }

    #[test]
    fn test_parse_range_no_match() {
        assert_eq!(parse_range(""), Range::unknown());
        assert_eq!(parse_range("Test optional"), Range::unknown());
        assert_eq!(parse_range("1500"), Range::unknown());
    }

    #[test]
    fn test_parse_rank_fallback() {
        assert_eq!(parse_rank("12", 0), 12);
        assert_eq!(parse_rank("#4", 0), 4);
        assert_eq!(parse_rank("", 6), 7);
        assert_eq!(parse_rank("n/a", 0), 1);
        assert_eq!(parse_rank("0", 2), 3);
    }

    #[test]
    fn test_parse_acceptance_rate() {
        assert_eq!(parse_acceptance_rate("0.08"), 0.08);
        assert!((parse_acceptance_rate("7%") - 0.07).abs() < 1e-12);
        assert!((parse_acceptance_rate("3.9") - 0.039).abs() < 1e-12);
        assert_eq!(parse_acceptance_rate("unknown"), DEFAULT_ACCEPTANCE_RATE);
        assert_eq!(parse_acceptance_rate(""), DEFAULT_ACCEPTANCE_RATE);
    }

    #[test]
    fn test_parse_acceptance_rate_clamped() {
        assert_eq!(parse_acceptance_rate("0.001"), MIN_ACCEPTANCE_RATE);
        assert_eq!(parse_acceptance_rate("0.99"), MAX_ACCEPTANCE_RATE);
        assert_eq!(parse_acceptance_rate("-0.5"), DEFAULT_ACCEPTANCE_RATE);
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$62,000"), 62000.0);
        assert_eq!(parse_currency("90"), 90.0);
        assert_eq!(parse_currency("Free"), 0.0);
        assert_eq!(parse_currency(""), 0.0);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("Yes"));
        assert!(parse_flag("YES"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("No"));
        assert!(!parse_flag("y"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_normalize_full_row() {
        let text = "Rank,University,Type,GPA_Range,SAT_Range,ACT_Range,Acceptance_Rate,Average_Aid,Early_Decision,Early_Action,Application_Fee,Need_Blind,Merit_Aid,Special_Programs,Notable_Strengths\n\
                    3,Acme University,Research,\"3.70-4.00\",\"1400-1550\",\"32-35\",0.08,\"$55,000\",Yes,No,$85,yes,None,Honors College,\"Biology, Chemistry, Research\"\n";
        let records = parse_records(text).unwrap();
        let school = normalize_record(&records[0], 0);

        assert_eq!(school.id, SchoolId(0));
        assert_eq!(school.name, "Acme University");
        assert_eq!(school.rank, 3);
        assert_eq!(school.school_type, SchoolType::Research);
        assert_eq!(school.gpa, Range::new(3.7, 4.0));
        assert_eq!(school.sat, Range::new(1400.0, 1550.0));
        assert_eq!(school.act, Range::new(32.0, 35.0));
        assert_eq!(school.acceptance_rate, 0.08);
        assert_eq!(school.average_aid, 55000.0);
        assert!(school.early_decision);
        assert!(!school.early_action);
        assert!(school.need_blind);
        assert_eq!(school.application_fee, 85.0);
        assert_eq!(school.notable_strengths, "Biology, Chemistry, Research");
    }

    #[test]
    fn test_normalize_malformed_row_uses_defaults() {
        let text = "Rank,University,Acceptance_Rate,GPA_Range\n???,Broken College,n/a,garbage\n";
        let records = parse_records(text).unwrap();
        let school = normalize_record(&records[0], 4);

        assert_eq!(school.rank, 5);
        assert_eq!(school.acceptance_rate, DEFAULT_ACCEPTANCE_RATE);
        assert!(!school.gpa.is_known());
        assert!(!school.sat.is_known());
        assert_eq!(school.school_type, SchoolType::Research);
    }
}
