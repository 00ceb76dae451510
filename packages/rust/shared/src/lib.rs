//! Shared types, error model, and configuration for the résumé wizard.
//!
//! This crate is the foundation depended on by all other cvwizard crates.
//! It provides:
//! - [`CvWizardError`], the unified error type
//! - Domain and wire types ([`Section`], [`CandidateId`], [`SubmissionPayload`], [`JobPosting`])
//! - Configuration ([`AppConfig`], [`GatewayConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BackendConfig, DownloadConfig, GatewayConfig, SearchConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{CvWizardError, Result};
pub use types::{
    ApplyRequest, ApplyResponse, CandidateId, FieldMap, JobPosting, KNOWN_STYLES, MAIN_FIELDS,
    REQUIRED_MAIN_FIELDS, Section, SubmissionPayload, SubmitErrorBody, SubmitResponse,
    SummaryPayload, SummaryResponse, TOTAL_STEPS,
};
