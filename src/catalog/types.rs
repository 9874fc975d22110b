use std::fmt;

/// Position of a school's row in the source dataset (zero-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchoolId(pub usize);

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchoolType {
    Research,
    Lac,
}

impl SchoolType {
    /// Parse the dataset's Type column. Anything that is not a liberal arts
    /// college is treated as a research university.
    pub fn parse(s: &str) -> Self {
        let s = s.trim().to_ascii_lowercase();
        if s == "lac" || s.starts_with("liberal") {
            SchoolType::Lac
        } else {
            SchoolType::Research
        }
    }

    /// Highest rank a school of this type may carry and still be listed.
    pub fn max_rank(&self) -> u32 {
        match self {
            SchoolType::Research => 300,
            SchoolType::Lac => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolType::Research => "Research",
            SchoolType::Lac => "LAC",
        }
    }
}

impl fmt::Display for SchoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A "low-high" statistic such as a middle-50% GPA or SAT band.
/// Both bounds are either present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl Range {
    /// Build a known range, swapping the bounds if they arrive reversed.
    pub fn new(low: f64, high: f64) -> Self {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_known(&self) -> bool {
        self.low.is_some() && self.high.is_some()
    }

    pub fn midpoint(&self) -> Option<f64> {
        match (self.low, self.high) {
            (Some(low), Some(high)) => Some((low + high) / 2.0),
            _ => None,
        }
    }

    /// Render as "low-high" with the given number of decimals, or "n/a".
    pub fn display(&self, decimals: usize) -> String {
        match (self.low, self.high) {
            (Some(low), Some(high)) => format!("{:.*}-{:.*}", decimals, low, decimals, high),
            _ => "n/a".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub rank: u32,
    pub school_type: SchoolType,
    pub gpa: Range,
    pub sat: Range,
    pub act: Range,
    /// Historical acceptance rate as a fraction, always within [0.005, 0.95].
    pub acceptance_rate: f64,
    pub average_aid: f64,
    pub early_decision: bool,
    pub early_action: bool,
    pub need_blind: bool,
    pub application_fee: f64,
    pub merit_aid: String,
    pub special_programs: String,
    pub notable_strengths: String,
}

impl School {
    /// LAC schools must rank within the top 30, research universities
    /// within the top 300.
    pub fn is_eligible(&self) -> bool {
        self.rank >= 1 && self.rank <= self.school_type.max_rank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_school_type_parse() {
        assert_eq!(SchoolType::parse("LAC"), SchoolType::Lac);
        assert_eq!(SchoolType::parse(" lac "), SchoolType::Lac);
        assert_eq!(SchoolType::parse("Liberal Arts"), SchoolType::Lac);
        assert_eq!(SchoolType::parse("Research"), SchoolType::Research);
        assert_eq!(SchoolType::parse(""), SchoolType::Research);
    }

    #[test]
    fn test_range_swaps_reversed_bounds() {
        let range = Range::new(4.0, 3.7);
        assert_eq!(range.low, Some(3.7));
        assert_eq!(range.high, Some(4.0));
    }

    #[test]
    fn test_range_midpoint() {
        assert_eq!(Range::new(1400.0, 1550.0).midpoint(), Some(1475.0));
        assert_eq!(Range::unknown().midpoint(), None);
    }

    #[test]
    fn test_range_display() {
        assert_eq!(Range::new(3.7, 4.0).display(2), "3.70-4.00");
        assert_eq!(Range::new(1400.0, 1550.0).display(0), "1400-1550");
        assert_eq!(Range::unknown().display(0), "n/a");
    }
}
