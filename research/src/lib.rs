//! # IPEDS research - Big Ten completions dataset builder
//!
//! Reads the IPEDS Completions extract, the IPEDS Header/Directory file and
//! the NCES CIP taxonomy, keeps the Big Ten institutions, attaches CIP2/CIP6
//! titles and award-level labels, checks guardrails, and writes one CSV.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────┐   ┌─────────────┐   ┌────────────┐   ┌────────────┐
//! │ C2024_A.csv  │   │           │   │  filter +   │   │            │   │ research_  │
//! │ HD2024.csv   │──▶│  Parser   │──▶│  CIP joins  │──▶│ Guardrails │──▶│ bigten_... │
//! │ CIPCode.csv  │   │ (auto-enc)│   │  + labels   │   │            │   │   .csv     │
//! └──────────────┘   └───────────┘   └─────────────┘   └────────────┘   └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`config`] - Build options and default paths
//! - [`logs`] - Leveled progress logging
//! - [`parser`] - CSV loading with encoding detection
//! - [`models`] - Input rows, award levels, output record
//! - [`cip`] - CIP code normalization and de-wrapping
//! - [`allowlist`] - Big Ten UNITID allow-list
//! - [`transform`] - Lookups and the pipeline
//! - [`validation`] - Output guardrails

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod cip;
pub mod parser;

// Transformation
pub mod allowlist;
pub mod transform;

// Validation
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::BuildOptions;

pub use error::{CsvError, PipelineError, SchemaError, ValidationError};

pub use models::{AwardLevel, DegreeGroup, ResearchRecord};

pub use cip::{dewrap, is_cip6, normalize_cipcode, normalize_numeric_cipcode};

pub use parser::{read_table, read_table_columns, Table};

pub use allowlist::{
    default_unitids, institution_label, load_unitids, BIGTEN_INSTITUTIONS, EXPECTED_INSTITUTIONS,
};

pub use transform::pipeline::{build, transform, write_research_csv, BuildReport};

pub use validation::{check_guardrails, missing_institutions};
