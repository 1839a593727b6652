use serde::Serialize;

use super::super::domain::Applicant;
use super::{FairnessLevel, NumericAttribute};

/// Mean shift of a numeric attribute between the shortlist and the population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericDisparity {
    pub attribute: NumericAttribute,
    pub population_mean: f64,
    pub selected_mean: f64,
    /// `|selected_mean - population_mean| / std(population)`.
    pub disparity: f64,
}

impl NumericDisparity {
    pub fn level(&self) -> FairnessLevel {
        FairnessLevel::classify(self.disparity)
    }
}

/// Returns `None` when either the population or the shortlist has no values.
///
/// The population spread is the sample standard deviation; it is replaced by `1.0` when it
/// is zero or undefined, so a flat population reads any mean shift at face value.
pub fn numeric_disparity(
    population: &[Applicant],
    mask: &[bool],
    attribute: NumericAttribute,
) -> Option<NumericDisparity> {
    let values: Vec<f64> = population
        .iter()
        .filter_map(|applicant| attribute.value_of(applicant))
        .collect();
    let selected: Vec<f64> = population
        .iter()
        .zip(mask)
        .filter(|(_, chosen)| **chosen)
        .filter_map(|(applicant, _)| attribute.value_of(applicant))
        .collect();

    let population_mean = mean(&values)?;
    let selected_mean = mean(&selected)?;
    let spread = match sample_std(&values, population_mean) {
        Some(std) if std > 0.0 => std,
        _ => 1.0,
    };

    Some(NumericDisparity {
        attribute,
        population_mean,
        selected_mean,
        disparity: (selected_mean - population_mean).abs() / spread,
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let squared: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    Some((squared / (values.len() - 1) as f64).sqrt())
}
