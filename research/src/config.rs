//! Build configuration: input/output locations and the guardrail target.

use crate::allowlist::EXPECTED_INSTITUTIONS;
use std::path::{Path, PathBuf};

/// Root the default paths are relative to.
pub const DEFAULT_DATA_ROOT: &str = "..";

/// Options for [`crate::transform::pipeline::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// IPEDS Completions extract (e.g. `C2024_A.csv`)
    pub completions_path: PathBuf,

    /// IPEDS Header/Directory file (e.g. `HD2024.csv`)
    pub hd_path: PathBuf,

    /// NCES CIP taxonomy (e.g. `CIPCode2020.csv`)
    pub cip_path: PathBuf,

    /// Optional allow-list override; the embedded list is used when absent
    pub bigten_unitids_path: Option<PathBuf>,

    pub out_path: PathBuf,

    /// Distinct institutions the output must contain
    pub expected_institutions: usize,
}

impl BuildOptions {
    /// Default layout under `root`:
    ///
    /// ```text
    /// <root>/data/raw/ipeds/{C2024_A,HD2024,CIPCode2020}.csv
    /// <root>/data/processed/ipeds/bigten_unitids_named.csv
    /// <root>/data/processed/ipeds/research_bigten_completions_2024.csv
    /// ```
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let raw = root.as_ref().join("data").join("raw").join("ipeds");
        let processed = root.as_ref().join("data").join("processed").join("ipeds");

        Self {
            completions_path: raw.join("C2024_A.csv"),
            hd_path: raw.join("HD2024.csv"),
            cip_path: raw.join("CIPCode2020.csv"),
            bigten_unitids_path: Some(processed.join("bigten_unitids_named.csv")),
            out_path: processed.join("research_bigten_completions_2024.csv"),
            expected_institutions: EXPECTED_INSTITUTIONS,
        }
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::with_root(DEFAULT_DATA_ROOT)
    }
}
