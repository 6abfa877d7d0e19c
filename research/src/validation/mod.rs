//! Guardrails run on the finished research table before it is written.
//!
//! 1. The table covers exactly the expected number of institutions.
//! 2. No row is missing its CIP2 title.
//! 3. No six-digit CIP row is missing its CIP6 title.
//!
//! The first failing check aborts the build.

use crate::allowlist::institution_label;
use crate::error::{ValidationError, ValidationResult};
use crate::models::ResearchRecord;
use std::collections::HashSet;

/// Counts gathered while checking the guardrails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardrailReport {
    pub institutions: usize,
    pub cip6_rows: usize,
}

/// Distinct non-missing UNITIDs.
pub fn distinct_institutions(records: &[ResearchRecord]) -> usize {
    records
        .iter()
        .filter_map(|r| r.unitid)
        .collect::<HashSet<_>>()
        .len()
}

/// Allow-listed UNITIDs that produced no rows, in allow-list order.
pub fn missing_institutions(records: &[ResearchRecord], unitids: &[i64]) -> Vec<i64> {
    let present: HashSet<i64> = records.iter().filter_map(|r| r.unitid).collect();
    let mut seen = HashSet::new();
    unitids
        .iter()
        .copied()
        .filter(|id| !present.contains(id) && seen.insert(*id))
        .collect()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check all guardrails, returning the first failure.
///
/// `unitids` is the allow-list; it only names the missing campuses when the
/// institution count is off.
pub fn check_guardrails(
    records: &[ResearchRecord],
    unitids: &[i64],
    expected_institutions: usize,
) -> ValidationResult<GuardrailReport> {
    let institutions = distinct_institutions(records);
    if institutions != expected_institutions {
        return Err(ValidationError::InstitutionCount {
            expected: expected_institutions,
            actual: institutions,
            missing: missing_institutions(records, unitids)
                .into_iter()
                .map(institution_label)
                .collect(),
        });
    }

    let missing_cip2 = records.iter().filter(|r| is_blank(&r.cip2_title)).count();
    if missing_cip2 != 0 {
        return Err(ValidationError::MissingCip2Titles(missing_cip2));
    }

    let cip6_rows: Vec<&ResearchRecord> = records.iter().filter(|r| r.is_cip6).collect();
    let missing_cip6 = cip6_rows.iter().filter(|r| is_blank(&r.cip6_title)).count();
    if missing_cip6 != 0 {
        return Err(ValidationError::MissingCip6Titles(missing_cip6));
    }

    Ok(GuardrailReport {
        institutions,
        cip6_rows: cip6_rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(unitid: i64) -> ResearchRecord {
        ResearchRecord {
            unitid: Some(unitid),
            institution: None,
            cip2: Some("03".into()),
            cip2_title: "Natural Resources and Conservation".into(),
            cipcode: Some("03.0104".into()),
            cip6_title: "Environmental Science.".into(),
            is_cip6: true,
            major_number: Some(1),
            award_level_code: Some(5),
            award_level_name: Some("Bachelors".into()),
            degree_group: None,
            award_count_total: Some(12),
        }
    }

    #[test]
    fn test_passes_with_expected_institutions() {
        let records = vec![record(1), record(2), record(2)];
        let report = check_guardrails(&records, &[1, 2], 2).unwrap();

        assert_eq!(report.institutions, 2);
        assert_eq!(report.cip6_rows, 3);
    }

    #[test]
    fn test_empty_table_fails_institution_count() {
        let err = check_guardrails(&[], &[], 18).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InstitutionCount { expected: 18, actual: 0, .. }
        ));
    }

    #[test]
    fn test_missing_unitids_not_counted() {
        let mut orphan = record(1);
        orphan.unitid = None;
        assert_eq!(distinct_institutions(&[record(1), orphan]), 1);
    }

    #[test]
    fn test_missing_institutions_in_allow_list_order() {
        let records = vec![record(171100), record(151351), record(999999)];
        let unitids = [151351, 153658, 171100, 209551, 153658];

        assert_eq!(missing_institutions(&records, &unitids), vec![153658, 209551]);
    }

    #[test]
    fn test_count_failure_names_missing_campuses() {
        let records = vec![record(151351), record(171100)];
        let err = check_guardrails(&records, &[151351, 171100, 153658], 3).unwrap_err();

        match err {
            ValidationError::InstitutionCount { expected, actual, missing } => {
                assert_eq!((expected, actual), (3, 2));
                assert_eq!(missing, vec!["153658 (University of Iowa)"]);
            }
            other => panic!("expected institution count failure, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_cip2_title_fails() {
        let mut bad = record(1);
        bad.cip2_title = String::new();
        let err = check_guardrails(&[bad], &[1], 1).unwrap_err();
        assert!(matches!(err, ValidationError::MissingCip2Titles(1)));
    }

    #[test]
    fn test_blank_cip6_title_only_checked_for_cip6_rows() {
        let mut aggregate = record(1);
        aggregate.is_cip6 = false;
        aggregate.cip6_title = String::new();
        assert!(check_guardrails(&[aggregate.clone()], &[1], 1).is_ok());

        aggregate.is_cip6 = true;
        let err = check_guardrails(&[aggregate], &[1], 1).unwrap_err();
        assert!(matches!(err, ValidationError::MissingCip6Titles(1)));
    }
}
