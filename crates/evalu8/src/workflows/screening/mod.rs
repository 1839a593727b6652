//! Applicant screening audit: intake, selection models, and fairness metrics.
//!
//! Batches flow one way: raw `{name, cv}` records are normalized by the
//! [`repository`], scored by a [`selection`] model, and the resulting shortlist is
//! examined by [`disparity`] and [`robustness`]. [`session`] keeps the current batch and
//! its last run together for collaborators that work in several steps.

pub mod disparity;
pub mod domain;
pub mod export;
pub mod extractor;
pub mod report;
pub mod repository;
pub mod robustness;
pub mod selection;
pub mod session;

#[cfg(test)]
mod tests;

pub use disparity::{
    CategoricalDisparity, FairnessLevel, NumericDisparity, ProtectedAttribute, SelectionRates,
};
pub use domain::{AgeBand, Applicant, AugmentedApplicantRow, Gender, RawApplicantRecord};
pub use export::{to_csv_string, write_csv};
pub use report::AuditReport;
pub use repository::{ApplicantRepository, DataSource, DataSourceError};
pub use robustness::{RobustnessError, RobustnessReport};
pub use selection::{
    run_all_models, run_all_models_from_source, run_model, run_model_from_source, ModelId,
    UnknownModelError,
};
pub use session::{AuditSession, ModelRun};

/// Umbrella error for the screening entry points used by collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    UnknownModel(#[from] UnknownModelError),
    #[error(transparent)]
    Robustness(#[from] RobustnessError),
}
