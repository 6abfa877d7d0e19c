//! Institution allow-list.
//!
//! The research dataset covers the Big Ten flagship campuses. The list is
//! embedded; a CSV with a `UNITID` (or `unitid`) column can override it.

use crate::error::{SchemaError, SchemaResult};
use crate::parser::read_table;
use std::path::Path;

/// Big Ten flagship campuses (UNITID, name) as used by the research dataset.
pub const BIGTEN_INSTITUTIONS: [(i64, &str); 18] = [
    (151351, "Indiana University-Bloomington"),
    (171100, "Michigan State University"),
    (147767, "Northwestern University"),
    (204796, "Ohio State University-Main Campus"),
    (214777, "Pennsylvania State University-Main Campus"),
    (243780, "Purdue University-Main Campus"),
    (186380, "Rutgers University-New Brunswick"),
    (110662, "University of California-Los Angeles"),
    (145637, "University of Illinois Urbana-Champaign"),
    (153658, "University of Iowa"),
    (163286, "University of Maryland-College Park"),
    (170976, "University of Michigan-Ann Arbor"),
    (174066, "University of Minnesota-Twin Cities"),
    (181464, "University of Nebraska-Lincoln"),
    (209551, "University of Oregon"),
    (123961, "University of Southern California"),
    (236948, "University of Washington-Seattle Campus"),
    (240444, "University of Wisconsin-Madison"),
];

/// Number of institutions the dataset must cover.
pub const EXPECTED_INSTITUTIONS: usize = BIGTEN_INSTITUTIONS.len();

/// The embedded UNITIDs, in list order.
pub fn default_unitids() -> Vec<i64> {
    BIGTEN_INSTITUTIONS.iter().map(|(id, _)| *id).collect()
}

/// Campus name for an embedded UNITID.
pub fn institution_name(unitid: i64) -> Option<&'static str> {
    BIGTEN_INSTITUTIONS
        .iter()
        .find(|(id, _)| *id == unitid)
        .map(|(_, name)| *name)
}

/// `"151351 (Indiana University-Bloomington)"`, or the bare id when the
/// campus is not in the embedded list.
pub fn institution_label(unitid: i64) -> String {
    match institution_name(unitid) {
        Some(name) => format!("{} ({})", unitid, name),
        None => unitid.to_string(),
    }
}

/// Numeric ids are truncated toward zero (`"151351.9"` reads as 151351).
fn coerce_unitid(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    if let Ok(value) = s.parse::<i64>() {
        return Some(value);
    }
    let value = s.parse::<f64>().ok()?.trunc();
    (value.is_finite() && value.abs() < i64::MAX as f64).then_some(value as i64)
}

/// Load the allow-list.
///
/// - No path, or a path that does not exist: the embedded list.
/// - Otherwise the file must have a `UNITID` or `unitid` column; values that
///   do not parse as numbers are dropped and fractional ids are truncated. An
///   empty result falls back to the embedded list.
pub fn load_unitids(path: Option<&Path>) -> SchemaResult<Vec<i64>> {
    let path = match path {
        Some(p) if p.exists() => p,
        _ => return Ok(default_unitids()),
    };

    let table = read_table(path)?;
    let col = table
        .find_column("UNITID")
        .or_else(|| table.find_column("unitid"))
        .ok_or_else(|| SchemaError::MissingUnitidColumn {
            path: path.to_path_buf(),
            columns: table.headers.clone(),
        })?;

    let unitids: Vec<i64> = table.column_values(col).filter_map(coerce_unitid).collect();
    if unitids.is_empty() {
        Ok(default_unitids())
    } else {
        Ok(unitids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_default_list_has_eighteen_distinct_ids() {
        let ids = default_unitids();
        let mut distinct = ids.clone();
        distinct.sort_unstable();
        distinct.dedup();

        assert_eq!(ids.len(), 18);
        assert_eq!(distinct.len(), 18);
        assert_eq!(ids[0], 151351);
    }

    #[test]
    fn test_no_path_uses_default() {
        assert_eq!(load_unitids(None).unwrap(), default_unitids());
    }

    #[test]
    fn test_missing_file_uses_default() {
        let path = Path::new("/nonexistent/bigten_unitids_named.csv");
        assert_eq!(load_unitids(Some(path)).unwrap(), default_unitids());
    }

    #[test]
    fn test_uppercase_column() {
        let file = write_csv("UNITID,INSTNM\n151351,Indiana\n171100,Michigan State\n");
        assert_eq!(load_unitids(Some(file.path())).unwrap(), vec![151351, 171100]);
    }

    #[test]
    fn test_lowercase_column_drops_unparseable() {
        let file = write_csv("unitid\n151351\nn/a\n\n240444.0\n");
        assert_eq!(load_unitids(Some(file.path())).unwrap(), vec![151351, 240444]);
    }

    #[test]
    fn test_other_casing_is_schema_error() {
        let file = write_csv("UnitId,name\n151351,Indiana\n");
        let err = load_unitids(Some(file.path())).unwrap_err();
        match err {
            SchemaError::MissingUnitidColumn { columns, .. } => {
                assert_eq!(columns, vec!["UnitId", "name"]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_no_usable_ids_falls_back() {
        let file = write_csv("UNITID\nabc\n");
        assert_eq!(load_unitids(Some(file.path())).unwrap(), default_unitids());
    }

    #[test]
    fn test_institution_name_lookup() {
        assert_eq!(institution_name(240444), Some("University of Wisconsin-Madison"));
        assert_eq!(institution_name(1), None);
    }

    #[test]
    fn test_institution_label() {
        assert_eq!(institution_label(153658), "153658 (University of Iowa)");
        assert_eq!(institution_label(100654), "100654");
    }

    #[test]
    fn test_fractional_ids_truncated() {
        let file = write_csv("UNITID\n151351.9\n240444.0\nnan\ninf\n");
        assert_eq!(load_unitids(Some(file.path())).unwrap(), vec![151351, 240444]);
    }
}
