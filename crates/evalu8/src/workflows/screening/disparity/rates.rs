use std::collections::BTreeMap;

use serde::Serialize;

use super::super::domain::Applicant;
use super::ProtectedAttribute;

/// Minimum impact ratio accepted by the four-fifths rule.
pub const FOUR_FIFTHS_THRESHOLD: f64 = 0.8;

/// Per-group selection rates and the adverse-impact figures derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionRates {
    pub attribute: ProtectedAttribute,
    /// Selected members divided by group members.
    pub rates: BTreeMap<String, f64>,
    /// Highest rate minus lowest rate.
    pub parity_difference: f64,
    /// Lowest rate over highest rate; absent when no group had anyone selected.
    pub impact_ratio: Option<f64>,
    pub four_fifths_compliant: bool,
}

pub fn selection_rates(
    population: &[Applicant],
    mask: &[bool],
    attribute: ProtectedAttribute,
) -> Option<SelectionRates> {
    let mut tallies: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (applicant, &selected) in population.iter().zip(mask) {
        if let Some(group) = attribute.group_of(applicant) {
            let entry = tallies.entry(group).or_default();
            entry.1 += 1;
            if selected {
                entry.0 += 1;
            }
        }
    }

    if tallies.is_empty() {
        return None;
    }

    let rates: BTreeMap<String, f64> = tallies
        .into_iter()
        .map(|(group, (selected, members))| (group, selected as f64 / members as f64))
        .collect();

    let highest = rates.values().copied().fold(f64::MIN, f64::max);
    let lowest = rates.values().copied().fold(f64::MAX, f64::min);
    let impact_ratio = (highest > 0.0).then(|| lowest / highest);

    Some(SelectionRates {
        attribute,
        parity_difference: highest - lowest,
        four_fifths_compliant: impact_ratio.map_or(true, |ratio| ratio >= FOUR_FIFTHS_THRESHOLD),
        impact_ratio,
        rates,
    })
}
