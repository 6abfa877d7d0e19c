//! Domain models for the research dataset build.
//!
//! - [`CompletionRecord`] - One row of the IPEDS Completions extract
//! - [`DirectoryEntry`] - Institution id and name from the Header/Directory file
//! - [`TaxonomyEntry`] - One row of the NCES CIP taxonomy
//! - [`AwardLevel`] / [`DegreeGroup`] - Award-level labels
//! - [`ResearchRecord`] - One row of the output dataset

use crate::error::CsvResult;
use crate::parser::Table;
use serde::{Serialize, Serializer};

/// Placeholder title for CIP2 families missing from the taxonomy.
pub const UNCLASSIFIED_CIP2_TITLE: &str = "99 - Unclassified / Not in CIP taxonomy";

/// Placeholder title for codes that are not six-digit programs.
pub const NOT_CIP6_TITLE: &str = "Not a CIP6 program (aggregate / unclassified)";

/// Output column order.
pub const RESEARCH_COLUMNS: [&str; 12] = [
    "unitid",
    "institution",
    "cip2",
    "cip2_title",
    "cipcode",
    "cip6_title",
    "is_cip6",
    "major_number",
    "award_level_code",
    "award_level_name",
    "degree_group",
    "award_count_total",
];

/// Coerce a cell to a nullable integer.
///
/// Integral floats (`"12.0"`) are accepted; fractional, non-numeric and
/// missing values become `None`.
pub fn coerce_int(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn trimmed(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

// =============================================================================
// Input rows
// =============================================================================

/// Raw completions row with loosely typed columns already coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRecord {
    pub unitid: Option<i64>,
    /// Unnormalized CIPCODE cell
    pub cipcode: Option<String>,
    pub major_number: Option<i64>,
    pub award_level_code: Option<i64>,
    pub award_count_total: Option<i64>,
}

impl CompletionRecord {
    pub const COLUMNS: [&'static str; 5] = ["UNITID", "CIPCODE", "MAJORNUM", "AWLEVEL", "CTOTALT"];

    pub fn from_table(table: &Table) -> CsvResult<Vec<Self>> {
        let unitid = table.require_column("UNITID")?;
        let cipcode = table.require_column("CIPCODE")?;
        let major = table.require_column("MAJORNUM")?;
        let awlevel = table.require_column("AWLEVEL")?;
        let total = table.require_column("CTOTALT")?;

        Ok((0..table.len())
            .map(|row| CompletionRecord {
                unitid: coerce_int(table.cell(row, unitid)),
                cipcode: table.cell(row, cipcode).map(str::to_string),
                major_number: coerce_int(table.cell(row, major)),
                award_level_code: coerce_int(table.cell(row, awlevel)),
                award_count_total: coerce_int(table.cell(row, total)),
            })
            .collect())
    }
}

/// Institution directory row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirectoryEntry {
    pub unitid: Option<i64>,
    pub institution: Option<String>,
}

impl DirectoryEntry {
    pub const COLUMNS: [&'static str; 2] = ["UNITID", "INSTNM"];

    pub fn from_table(table: &Table) -> CsvResult<Vec<Self>> {
        let unitid = table.require_column("UNITID")?;
        let name = table.require_column("INSTNM")?;

        Ok((0..table.len())
            .map(|row| DirectoryEntry {
                unitid: coerce_int(table.cell(row, unitid)),
                institution: table.cell(row, name).map(str::to_string),
            })
            .collect())
    }
}

/// CIP taxonomy row with the code de-wrapped and text trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyEntry {
    pub cipcode: Option<String>,
    pub title: Option<String>,
    pub family: Option<String>,
}

impl TaxonomyEntry {
    pub const COLUMNS: [&'static str; 3] = ["CIPCode", "CIPTitle", "CIPFamily"];

    pub fn from_table(table: &Table) -> CsvResult<Vec<Self>> {
        let code = table.require_column("CIPCode")?;
        let title = table.require_column("CIPTitle")?;
        let family = table.require_column("CIPFamily")?;

        Ok((0..table.len())
            .map(|row| TaxonomyEntry {
                cipcode: crate::cip::dewrap_cell(table.cell(row, code)),
                title: trimmed(table.cell(row, title)),
                family: trimmed(table.cell(row, family)),
            })
            .collect())
    }
}

// =============================================================================
// Award levels
// =============================================================================

/// IPEDS award levels the research dataset labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardLevel {
    /// AWLEVEL 5
    Bachelors,
    /// AWLEVEL 7
    Masters,
    /// AWLEVEL 17
    DoctoralResearch,
}

impl AwardLevel {
    /// Map an AWLEVEL code; codes outside the labelled set give `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            5 => Some(AwardLevel::Bachelors),
            7 => Some(AwardLevel::Masters),
            17 => Some(AwardLevel::DoctoralResearch),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AwardLevel::Bachelors => "Bachelors",
            AwardLevel::Masters => "Masters",
            AwardLevel::DoctoralResearch => "Doctoral (Research/Scholarship)",
        }
    }

    pub fn degree_group(self) -> DegreeGroup {
        match self {
            AwardLevel::Bachelors => DegreeGroup::Bachelors,
            AwardLevel::Masters | AwardLevel::DoctoralResearch => DegreeGroup::Graduate,
        }
    }
}

/// Coarse degree grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DegreeGroup {
    Bachelors,
    Graduate,
}

// =============================================================================
// Output row
// =============================================================================

/// One row of the research dataset. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchRecord {
    pub unitid: Option<i64>,
    pub institution: Option<String>,
    pub cip2: Option<String>,
    pub cip2_title: String,
    pub cipcode: Option<String>,
    pub cip6_title: String,
    #[serde(serialize_with = "serialize_flag")]
    pub is_cip6: bool,
    pub major_number: Option<i64>,
    pub award_level_code: Option<i64>,
    pub award_level_name: Option<String>,
    pub degree_group: Option<DegreeGroup>,
    pub award_count_total: Option<i64>,
}

/// Booleans are spelled `True` / `False` in the published dataset.
fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_table;

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(Some("12")), Some(12));
        assert_eq!(coerce_int(Some(" 151351 ")), Some(151351));
        assert_eq!(coerce_int(Some("12.0")), Some(12));
        assert_eq!(coerce_int(Some("12.5")), None);
        assert_eq!(coerce_int(Some("abc")), None);
        assert_eq!(coerce_int(Some("")), None);
        assert_eq!(coerce_int(None), None);
    }

    #[test]
    fn test_award_level_mapping() {
        assert_eq!(AwardLevel::from_code(5).map(AwardLevel::name), Some("Bachelors"));
        assert_eq!(AwardLevel::from_code(7).map(AwardLevel::name), Some("Masters"));
        assert_eq!(
            AwardLevel::from_code(17).map(AwardLevel::name),
            Some("Doctoral (Research/Scholarship)")
        );
        assert_eq!(AwardLevel::from_code(3), None);
        assert_eq!(AwardLevel::from_code(18), None);
    }

    #[test]
    fn test_degree_group() {
        assert_eq!(AwardLevel::Bachelors.degree_group(), DegreeGroup::Bachelors);
        assert_eq!(AwardLevel::Masters.degree_group(), DegreeGroup::Graduate);
        assert_eq!(AwardLevel::DoctoralResearch.degree_group(), DegreeGroup::Graduate);
    }

    #[test]
    fn test_completions_from_table() {
        let csv = "UNITID,CIPCODE,MAJORNUM,AWLEVEL,CTOTALT\n151351,3.0104,1,5,12\n151351,99,2,x,\n";
        let table = parse_table("c", csv, b',').unwrap();
        let rows = CompletionRecord::from_table(&table).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].unitid, Some(151351));
        assert_eq!(rows[0].cipcode.as_deref(), Some("3.0104"));
        assert_eq!(rows[0].award_count_total, Some(12));
        assert_eq!(rows[1].award_level_code, None);
        assert_eq!(rows[1].award_count_total, None);
    }

    #[test]
    fn test_taxonomy_from_table_dewraps_and_trims() {
        let csv = "CIPFamily,CIPCode,CIPTitle\n\" Computer and Information Sciences \",\"=\"\"03.0104\"\"\",\"Computer and Information Sciences, General. \"\n";
        let table = parse_table("cip", csv, b',').unwrap();
        let rows = TaxonomyEntry::from_table(&table).unwrap();

        assert_eq!(rows[0].cipcode.as_deref(), Some("03.0104"));
        assert_eq!(rows[0].title.as_deref(), Some("Computer and Information Sciences, General."));
        assert_eq!(rows[0].family.as_deref(), Some("Computer and Information Sciences"));
    }

    #[test]
    fn test_directory_requires_instnm() {
        let table = parse_table("HD2024.csv", "UNITID,CITY\n1,Bloomington\n", b',').unwrap();
        assert!(DirectoryEntry::from_table(&table).is_err());
    }
}
