pub mod normalize;
pub mod parser;
pub mod source;
pub mod types;

pub use normalize::normalize_record;
pub use parser::{parse_records, RawRecord};
pub use source::{load_catalog, DatasetSource, BUNDLED_DATASET};
pub use types::{Range, School, SchoolId, SchoolType};

use std::path::PathBuf;

use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read dataset at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch dataset from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("dataset request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("dataset has no header row")]
    MissingHeader,
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// The immutable set of eligible schools. Built once and shared by
/// reference with the scoring engine and comparable ranking.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schools: Vec<School>,
}

impl Catalog {
    /// Parse delimited text into a catalog. Malformed rows are normalized
    /// with defaults; rows that are still ineligible are dropped.
    pub fn parse(data: impl AsRef<[u8]>) -> Result<Self, CatalogError> {
        let records = parse_records(data)?;
        let total = records.len();

        let schools: Vec<School> = records
            .iter()
            .enumerate()
            .map(|(row, record)| normalize_record(record, row))
            .filter(|school| {
                let keep = school.is_eligible();
                if !keep {
                    debug!(
                        school = %school.name,
                        rank = school.rank,
                        kind = %school.school_type,
                        "dropping ineligible school"
                    );
                }
                keep
            })
            .collect();

        info!(rows = total, kept = schools.len(), "catalog loaded");
        Ok(Self { schools })
    }

    /// Build a catalog from already-typed schools, applying the same
    /// eligibility filter as [`Catalog::parse`].
    pub fn from_schools(schools: Vec<School>) -> Self {
        Self {
            schools: schools.into_iter().filter(School::is_eligible).collect(),
        }
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn iter(&self) -> impl Iterator<Item = &School> {
        self.schools.iter()
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn get(&self, id: SchoolId) -> Option<&School> {
        self.schools.iter().find(|s| s.id == id)
    }

    /// Look a school up by name: an exact case-insensitive match wins,
    /// otherwise the best-ranked school whose name contains the query.
    pub fn find(&self, query: &str) -> Option<&School> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.schools
            .iter()
            .find(|s| s.name.to_lowercase() == needle)
            .or_else(|| {
                self.schools
                    .iter()
                    .filter(|s| s.name.to_lowercase().contains(&needle))
                    .min_by_key(|s| s.rank)
            })
    }

    pub fn of_type(&self, school_type: SchoolType) -> impl Iterator<Item = &School> {
        self.schools
            .iter()
            .filter(move |s| s.school_type == school_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Rank,University,Type,GPA_Range,SAT_Range,ACT_Range,Acceptance_Rate,Average_Aid,Early_Decision,Early_Action,Application_Fee,Need_Blind,Merit_Aid,Special_Programs,Notable_Strengths";

    fn dataset(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_lac_rank_31_excluded_rank_30_included() {
        let text = dataset(&[
            "30,Thirty College,LAC,\"3.60-3.90\",\"1350-1500\",\"31-34\",0.15,40000,Yes,No,60,No,,,Economics",
            "31,Thirty-One College,LAC,\"3.60-3.90\",\"1350-1500\",\"31-34\",0.15,40000,Yes,No,60,No,,,Economics",
        ]);
        let catalog = Catalog::parse(&text).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.schools()[0].name, "Thirty College");
    }

    #[test]
    fn test_research_rank_limit() {
        let text = dataset(&[
            "300,Edge University,Research,,,,0.5,0,No,No,0,No,,,",
            "301,Too Far University,Research,,,,0.5,0,No,No,0,No,,,",
        ]);
        let catalog = Catalog::parse(&text).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.schools()[0].rank, 300);
    }

    #[test]
    fn test_malformed_row_does_not_abort_load() {
        let text = dataset(&[
            "1,Good University,Research,\"3.80-4.00\",\"1480-1570\",\"33-35\",0.05,60000,No,Yes,90,Yes,,,Physics",
            "oops,\"Broken, Inc\"",
            "2,Other University,Research,\"3.70-4.00\",\"1450-1560\",\"33-35\",0.07,55000,Yes,No,80,Yes,,,History",
        ]);
        let catalog = Catalog::parse(&text).unwrap();
        assert_eq!(catalog.len(), 3);

        let broken = catalog.find("Broken, Inc").unwrap();
        assert_eq!(broken.rank, 2); // row index 1 -> rank 2
        assert_eq!(broken.acceptance_rate, 0.20);
        assert_eq!(broken.id, SchoolId(1));
    }

    #[test]
    fn test_malformed_lac_row_filtered_after_defaults() {
        // The 40th row has an unparseable rank, so it falls back to 40 and fails the LAC limit
        let mut rows = Vec::new();
        for i in 1..=39 {
            rows.push(format!("{i},Research {i},Research,,,,0.3,0,No,No,0,No,,,"));
        }
        rows.push("n/a,Mystery College,LAC,,,,0.3,0,No,No,0,No,,,".to_string());
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let catalog = Catalog::parse(&dataset(&refs)).unwrap();
        assert_eq!(catalog.len(), 39);
        assert!(catalog.find("Mystery College").is_none());
    }

    #[test]
    fn test_ids_follow_source_rows() {
        let text = dataset(&[
            "1,A University,Research,,,,0.1,0,No,No,0,No,,,",
            "99,B College,LAC,,,,0.1,0,No,No,0,No,,,",
            "2,C University,Research,,,,0.1,0,No,No,0,No,,,",
        ]);
        let catalog = Catalog::parse(&text).unwrap();
        let ids: Vec<SchoolId> = catalog.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![SchoolId(0), SchoolId(2)]);
        assert_eq!(catalog.get(SchoolId(2)).unwrap().name, "C University");
        assert!(catalog.get(SchoolId(1)).is_none());
    }

    #[test]
    fn test_find_exact_then_substring() {
        let text = dataset(&[
            "5,Stanford University,Research,,,,0.04,0,No,No,0,No,,,",
            "9,University of Chicago,Research,,,,0.05,0,No,No,0,No,,,",
            "12,Chicago State,Research,,,,0.5,0,No,No,0,No,,,",
        ]);
        let catalog = Catalog::parse(&text).unwrap();
        assert_eq!(catalog.find("stanford university").unwrap().rank, 5);
        assert_eq!(catalog.find("chicago").unwrap().name, "University of Chicago");
        assert_eq!(catalog.find("Chicago State").unwrap().rank, 12);
        assert!(catalog.find("Harvard").is_none());
        assert!(catalog.find("  ").is_none());
    }

    #[test]
    fn test_of_type() {
        let text = dataset(&[
            "1,A University,Research,,,,0.1,0,No,No,0,No,,,",
            "1,B College,LAC,,,,0.1,0,No,No,0,No,,,",
        ]);
        let catalog = Catalog::parse(&text).unwrap();
        assert_eq!(catalog.of_type(SchoolType::Lac).count(), 1);
        assert_eq!(catalog.of_type(SchoolType::Research).count(), 1);
    }

    #[test]
    fn test_header_only_is_empty_catalog() {
        let catalog = Catalog::parse(HEADER).unwrap();
        assert!(catalog.is_empty());
    }
}
