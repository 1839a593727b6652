use std::collections::BTreeMap;

use serde::Serialize;

use super::super::domain::Applicant;
use super::{FairnessLevel, ProtectedAttribute};

/// Group composition of a shortlist against the population and against uniform parity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalDisparity {
    pub attribute: ProtectedAttribute,
    /// Share of the shortlist per group, in percent. Zero for every group when nobody
    /// selected carries the attribute.
    pub selected_percentages: BTreeMap<String, f64>,
    pub population_percentages: BTreeMap<String, f64>,
    /// Max absolute gap between selected and population shares, in `[0, 1]`.
    pub baseline_disparity: f64,
    /// Max absolute gap between selected shares and `1 / groups`, in `[0, 1]`.
    pub parity_disparity: f64,
}

impl CategoricalDisparity {
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.selected_percentages.keys().map(String::as_str)
    }

    /// Fairness tier of the parity gap.
    pub fn level(&self) -> FairnessLevel {
        FairnessLevel::classify(self.parity_disparity)
    }
}

/// Returns `None` when no applicant carries the attribute; callers should not audit such an
/// attribute.
pub fn categorical_disparity(
    population: &[Applicant],
    mask: &[bool],
    attribute: ProtectedAttribute,
) -> Option<CategoricalDisparity> {
    let mut population_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut selected_counts: BTreeMap<String, usize> = BTreeMap::new();

    for (applicant, &selected) in population.iter().zip(mask) {
        let Some(group) = attribute.group_of(applicant) else {
            continue;
        };
        if selected {
            *selected_counts.entry(group.clone()).or_default() += 1;
        }
        *population_counts.entry(group).or_default() += 1;
    }

    if population_counts.is_empty() {
        return None;
    }

    let parity_share = 1.0 / population_counts.len() as f64;
    let population_share = shares(&population_counts, &population_counts);
    let selected_share = shares(&selected_counts, &population_counts);

    let mut baseline_disparity = 0.0_f64;
    let mut parity_disparity = 0.0_f64;
    for (group, selected) in &selected_share {
        let expected = population_share.get(group).copied().unwrap_or(0.0);
        baseline_disparity = baseline_disparity.max((selected - expected).abs());
        parity_disparity = parity_disparity.max((selected - parity_share).abs());
    }

    Some(CategoricalDisparity {
        attribute,
        selected_percentages: as_percentages(&selected_share),
        population_percentages: as_percentages(&population_share),
        baseline_disparity,
        parity_disparity,
    })
}

/// Fractions of `counts`, reindexed onto every group in `universe`.
fn shares(
    counts: &BTreeMap<String, usize>,
    universe: &BTreeMap<String, usize>,
) -> BTreeMap<String, f64> {
    let total: usize = counts.values().sum();
    universe
        .keys()
        .map(|group| {
            let count = counts.get(group).copied().unwrap_or(0);
            let share = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            (group.clone(), share)
        })
        .collect()
}

fn as_percentages(shares: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    shares
        .iter()
        .map(|(group, share)| (group.clone(), share * 100.0))
        .collect()
}
