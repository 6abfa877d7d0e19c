//! Research dataset pipeline: load → join names → filter → normalize →
//! join CIP titles → label → validate → write.
//!
//! # Example
//!
//! ```rust,ignore
//! use ipeds_research::{build, BuildOptions};
//!
//! let report = build(&BuildOptions::with_root("/srv/project"))?;
//! println!("Wrote {} rows to {}", report.output_rows, report.out_path.display());
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::lookup::{cip2_lookup, cip6_lookup, directory_lookup};
use crate::allowlist::{institution_label, load_unitids};
use crate::cip::{cip2_of, is_cip6, normalize_cipcode};
use crate::config::BuildOptions;
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{
    AwardLevel, CompletionRecord, DirectoryEntry, ResearchRecord, TaxonomyEntry,
    NOT_CIP6_TITLE, RESEARCH_COLUMNS, UNCLASSIFIED_CIP2_TITLE,
};
use crate::parser::read_table_columns;
use crate::validation::{check_guardrails, missing_institutions};

/// Summary of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub out_path: PathBuf,

    /// Rows in the raw completions extract
    pub completions_rows: usize,

    /// Rows written
    pub output_rows: usize,

    /// Distinct institutions written
    pub institutions: usize,

    /// Rows with a six-digit CIP code
    pub cip6_rows: usize,

    /// Rows whose CIP2 family is not in the taxonomy
    pub unclassified_rows: usize,
}

/// Run the whole build. Nothing is written unless every step succeeds.
pub fn build(options: &BuildOptions) -> PipelineResult<BuildReport> {
    log_info("Loading inputs...");
    let completions = CompletionRecord::from_table(&read_table_columns(
        &options.completions_path,
        &CompletionRecord::COLUMNS,
    )?)?;
    log_info_indent(
        format!("{}: {} rows", options.completions_path.display(), completions.len()),
        1,
    );

    let directory = DirectoryEntry::from_table(&read_table_columns(
        &options.hd_path,
        &DirectoryEntry::COLUMNS,
    )?)?;
    log_info_indent(
        format!("{}: {} rows", options.hd_path.display(), directory.len()),
        1,
    );

    let taxonomy = TaxonomyEntry::from_table(&read_table_columns(
        &options.cip_path,
        &TaxonomyEntry::COLUMNS,
    )?)?;
    log_info_indent(
        format!("{}: {} rows", options.cip_path.display(), taxonomy.len()),
        1,
    );

    let unitids = load_unitids(options.bigten_unitids_path.as_deref())?;
    log_success(format!("Allow-list: {} institutions", unitids.len()));

    let records = transform(&completions, &directory, &taxonomy, &unitids);
    log_success(format!("Transformed {} rows", records.len()));

    for unitid in missing_institutions(&records, &unitids) {
        log_warning(format!("No rows for {}", institution_label(unitid)));
    }

    let unclassified_rows = records
        .iter()
        .filter(|r| r.cip2_title == UNCLASSIFIED_CIP2_TITLE)
        .count();
    if unclassified_rows > 0 {
        log_warning(format!(
            "{} rows have a CIP2 family outside the taxonomy",
            unclassified_rows
        ));
    }

    log_info("Checking guardrails...");
    let guardrails = check_guardrails(&records, &unitids, options.expected_institutions)?;
    log_success(format!(
        "{} institutions, {} CIP6 rows",
        guardrails.institutions, guardrails.cip6_rows
    ));

    write_research_csv(&options.out_path, &records)?;
    log_success(format!("Wrote {}", options.out_path.display()));

    Ok(BuildReport {
        out_path: options.out_path.clone(),
        completions_rows: completions.len(),
        output_rows: records.len(),
        institutions: guardrails.institutions,
        cip6_rows: guardrails.cip6_rows,
        unclassified_rows,
    })
}

/// Build research rows from typed inputs.
///
/// Rows keep completions order. A join key with several matches (one UNITID
/// with two names, one family with two titles) yields one row per match.
pub fn transform(
    completions: &[CompletionRecord],
    directory: &[DirectoryEntry],
    taxonomy: &[TaxonomyEntry],
    unitids: &[i64],
) -> Vec<ResearchRecord> {
    let names = directory_lookup(directory);
    let cip2_titles = cip2_lookup(taxonomy);
    let cip6_titles = cip6_lookup(taxonomy);
    log_info_indent(
        format!(
            "lookups: {} names, {} CIP2 families, {} CIP6 programs",
            names.key_count(),
            cip2_titles.key_count(),
            cip6_titles.key_count()
        ),
        1,
    );

    let allowed: HashSet<i64> = unitids.iter().copied().collect();
    let mut records = Vec::new();

    for row in completions
        .iter()
        .filter(|r| r.unitid.is_some_and(|id| allowed.contains(&id)))
    {
        let cipcode = normalize_cipcode(row.cipcode.as_deref());
        let cip2 = cipcode.as_deref().map(cip2_of);
        let cip6 = cipcode.as_deref().is_some_and(is_cip6);
        let award_level = row.award_level_code.and_then(AwardLevel::from_code);

        for institution in names.join(row.unitid.as_ref()) {
            for cip2_title in cip2_titles.join(cip2.as_ref()) {
                for cip6_title in cip6_titles.join(cipcode.as_ref()) {
                    records.push(ResearchRecord {
                        unitid: row.unitid,
                        institution: institution.map(str::to_string),
                        cip2: cip2.clone(),
                        cip2_title: cip2_title.unwrap_or(UNCLASSIFIED_CIP2_TITLE).to_string(),
                        cipcode: cipcode.clone(),
                        cip6_title: cip6_title.unwrap_or(NOT_CIP6_TITLE).to_string(),
                        is_cip6: cip6,
                        major_number: row.major_number,
                        award_level_code: row.award_level_code,
                        award_level_name: award_level.map(|a| a.name().to_string()),
                        degree_group: award_level.map(AwardLevel::degree_group),
                        award_count_total: row.award_count_total,
                    });
                }
            }
        }
    }

    records
}

/// Serialize records to CSV bytes, header first.
pub fn to_csv_bytes(records: &[ResearchRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(RESEARCH_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Write the research CSV, creating the parent directory if needed.
///
/// The table is serialized in full before the file is touched.
pub fn write_research_csv(path: &Path, records: &[ResearchRecord]) -> PipelineResult<()> {
    let bytes = to_csv_bytes(records)?;

    let write_err = |source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, bytes).map_err(write_err)
}
