use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use super::disparity::selection_mask;
use super::domain::{Applicant, AugmentedApplicantRow};
use super::report::AuditReport;
use super::repository::{ApplicantRepository, DataSource, DataSourceError};
use super::robustness::RobustnessError;
use super::selection::ModelId;

/// Outcome of one model execution against a session's batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRun {
    pub model: ModelId,
    pub k: usize,
    pub selected: Vec<String>,
    pub executed_at: DateTime<Utc>,
}

impl ModelRun {
    pub fn new(model: ModelId, k: usize, selected: Vec<String>) -> Self {
        Self {
            model,
            k,
            selected,
            executed_at: Utc::now(),
        }
    }
}

/// The loaded batch together with its most recent model run.
///
/// A session starts on load and lives until the next batch replaces it; loading a new
/// batch always discards the previous run.
#[derive(Debug, Clone)]
pub struct AuditSession {
    source: String,
    applicants: Vec<Applicant>,
    last_run: Option<ModelRun>,
}

impl AuditSession {
    pub fn new(source: impl Into<String>, applicants: Vec<Applicant>) -> Self {
        Self {
            source: source.into(),
            applicants,
            last_run: None,
        }
    }

    pub fn from_source(source: &DataSource) -> Result<Self, DataSourceError> {
        let applicants = ApplicantRepository::load(source)?;
        Ok(Self::new(source.to_string(), applicants))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn applicants(&self) -> &[Applicant] {
        &self.applicants
    }

    pub fn last_run(&self) -> Option<&ModelRun> {
        self.last_run.as_ref()
    }

    /// Swap in a freshly loaded batch.
    pub fn replace_batch(&mut self, source: impl Into<String>, applicants: Vec<Applicant>) {
        self.source = source.into();
        self.applicants = applicants;
        self.last_run = None;
        info!(source = %self.source, applicants = self.applicants.len(), "session batch replaced");
    }

    /// Execute `model` over the batch and remember the result as the last run.
    pub fn run<R: Rng + ?Sized>(&mut self, model: ModelId, k: usize, rng: &mut R) -> &ModelRun {
        let selected = model.select(&self.applicants, k, rng);
        self.last_run.insert(ModelRun::new(model, k, selected))
    }

    /// Run `model`, audit the shortlist, and record the run only once the report is built.
    ///
    /// A rejected audit leaves the previous last run in place.
    pub fn audit<R: Rng + ?Sized>(
        &mut self,
        model: ModelId,
        k: usize,
        robustness_runs: usize,
        rng: &mut R,
    ) -> Result<AuditReport, RobustnessError> {
        let run = ModelRun::new(model, k, model.select(&self.applicants, k, rng));
        let report = AuditReport::build(&self.applicants, &run, robustness_runs, rng)?;
        self.last_run = Some(run);
        Ok(report)
    }

    /// Per-applicant rows for the last run; empty before any run.
    pub fn augmented_rows(&self) -> Vec<AugmentedApplicantRow> {
        let Some(run) = &self.last_run else {
            return Vec::new();
        };

        let mask = selection_mask(&self.applicants, &run.selected);
        self.applicants
            .iter()
            .zip(mask)
            .map(|(applicant, selected)| AugmentedApplicantRow::new(applicant, selected, run.model))
            .collect()
    }
}
