use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;

use super::domain::Applicant;
use super::selection::ModelId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RobustnessError {
    #[error("robustness estimate needs at least one run")]
    ZeroRuns,
}

/// Share of applicants whose outcome held across every run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobustnessReport {
    pub model: ModelId,
    pub runs: usize,
    pub stable_pct: f64,
    pub changed_pct: f64,
}

/// Re-run `model` `runs` times over `population` and bucket applicants by how consistently
/// they were selected. An empty population reads as fully stable.
///
/// Deterministic models repeat their first shortlist exactly, so they are evaluated once.
pub fn estimate<R: Rng + ?Sized>(
    model: ModelId,
    population: &[Applicant],
    k: usize,
    runs: usize,
    rng: &mut R,
) -> Result<RobustnessReport, RobustnessError> {
    if runs == 0 {
        return Err(RobustnessError::ZeroRuns);
    }

    let mut selection_counts: HashMap<&str, usize> = population
        .iter()
        .map(|applicant| (applicant.name.as_str(), 0))
        .collect();

    let passes = if model.is_deterministic() { 1 } else { runs };
    for _ in 0..passes {
        for name in model.select(population, k, rng) {
            if let Some(count) = selection_counts.get_mut(name.as_str()) {
                *count += 1;
            }
        }
    }

    let total = selection_counts.len();
    let stable = selection_counts
        .values()
        .filter(|&&count| count == 0 || count == passes)
        .count();

    let (stable_pct, changed_pct) = if total == 0 {
        (100.0, 0.0)
    } else {
        let stable_pct = stable as f64 / total as f64 * 100.0;
        (stable_pct, (total - stable) as f64 / total as f64 * 100.0)
    };

    Ok(RobustnessReport {
        model,
        runs,
        stable_pct,
        changed_pct,
    })
}
