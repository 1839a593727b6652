//! The five shortlisting models under audit.
//!
//! Every model takes the loaded batch and a target count `k` and returns at most `k`
//! applicant names, best first. Only [`ModelId::Model2`] consumes randomness; the rest ignore
//! the generator they are handed so callers can treat all models uniformly.

pub mod quota;
pub mod ranking;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use super::domain::Applicant;
use super::repository::{ApplicantRepository, DataSource};
use super::AuditError;

pub use quota::{QuotaAllocation, QuotaPhase};
pub use ranking::{rank_by_score, TARGET_COUNTRY};

/// Closed set of registered selection models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ModelId {
    #[serde(rename = "model_1")]
    Model1,
    #[serde(rename = "model_2")]
    Model2,
    #[serde(rename = "model_3")]
    Model3,
    #[serde(rename = "model_4")]
    Model4,
    #[serde(rename = "model_5")]
    Model5,
}

impl ModelId {
    pub const ALL: [ModelId; 5] = [
        ModelId::Model1,
        ModelId::Model2,
        ModelId::Model3,
        ModelId::Model4,
        ModelId::Model5,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ModelId::Model1 => "model_1",
            ModelId::Model2 => "model_2",
            ModelId::Model3 => "model_3",
            ModelId::Model4 => "model_4",
            ModelId::Model5 => "model_5",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ModelId::Model1 => "rank by final score",
            ModelId::Model2 => "uniform random draw",
            ModelId::Model3 => "rank by final score within Netherlands",
            ModelId::Model4 => "gender-balanced quota by final score",
            ModelId::Model5 => "rank by final score among male applicants",
        }
    }

    pub const fn is_deterministic(self) -> bool {
        !matches!(self, ModelId::Model2)
    }

    /// Shortlist up to `k` names from `applicants`.
    pub fn select<R: Rng + ?Sized>(
        self,
        applicants: &[Applicant],
        k: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let selected = match self {
            ModelId::Model1 => ranking::ranked_top_k(applicants, k),
            ModelId::Model2 => random_top_k(applicants, k, rng),
            ModelId::Model3 => ranking::country_filtered_top_k(applicants, k),
            ModelId::Model4 => quota::quota_balanced_top_k(applicants, k),
            ModelId::Model5 => ranking::male_filtered_top_k(applicants, k),
        };
        debug!(model = self.as_str(), k, selected = selected.len(), "model executed");
        selected
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = UnknownModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|model| model.as_str() == value)
            .ok_or_else(|| UnknownModelError(value.to_string()))
    }
}

/// Requested model identifier is not registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown model '{0}'")]
pub struct UnknownModelError(pub String);

fn random_top_k<R: Rng + ?Sized>(applicants: &[Applicant], k: usize, rng: &mut R) -> Vec<String> {
    let mut shuffled: Vec<&Applicant> = applicants.iter().collect();
    shuffled.shuffle(rng);
    ranking::top_names(shuffled, k)
}

/// Run the model registered as `model_id` over an already-loaded batch.
pub fn run_model<R: Rng + ?Sized>(
    model_id: &str,
    applicants: &[Applicant],
    k: usize,
    rng: &mut R,
) -> Result<Vec<String>, UnknownModelError> {
    let model: ModelId = model_id.parse()?;
    Ok(model.select(applicants, k, rng))
}

/// Run every registered model over the same batch.
pub fn run_all_models<R: Rng + ?Sized>(
    applicants: &[Applicant],
    k: usize,
    rng: &mut R,
) -> BTreeMap<ModelId, Vec<String>> {
    ModelId::ALL
        .into_iter()
        .map(|model| (model, model.select(applicants, k, rng)))
        .collect()
}

/// Resolve the model, load `source`, then run. The model is validated before any I/O.
pub fn run_model_from_source<R: Rng + ?Sized>(
    model_id: &str,
    k: usize,
    source: &DataSource,
    rng: &mut R,
) -> Result<Vec<String>, AuditError> {
    let model: ModelId = model_id.parse()?;
    let applicants = ApplicantRepository::load(source)?;
    Ok(model.select(&applicants, k, rng))
}

pub fn run_all_models_from_source<R: Rng + ?Sized>(
    k: usize,
    source: &DataSource,
    rng: &mut R,
) -> Result<BTreeMap<ModelId, Vec<String>>, AuditError> {
    let applicants = ApplicantRepository::load(source)?;
    Ok(run_all_models(&applicants, k, rng))
}
