//! Fairness metrics over a population and a selection mask.
//!
//! A selection mask is a `&[bool]` aligned index-for-index with the population slice; use
//! [`selection_mask`] to derive one from a model's shortlist.

mod categorical;
mod numeric;
mod rates;

pub use categorical::{categorical_disparity, CategoricalDisparity};
pub use numeric::{numeric_disparity, NumericDisparity};
pub use rates::{selection_rates, SelectionRates, FOUR_FIFTHS_THRESHOLD};

use std::collections::HashSet;

use serde::Serialize;

use super::domain::Applicant;

/// Upper bound (exclusive) of the "Fair" tier.
pub const FAIR_THRESHOLD: f64 = 0.10;
/// Upper bound (exclusive) of the "Warning" tier.
pub const WARNING_THRESHOLD: f64 = 0.20;

/// Fixed three-tier policy applied to any disparity scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FairnessLevel {
    Fair,
    Warning,
    HighDisparity,
}

impl FairnessLevel {
    pub fn classify(disparity: f64) -> Self {
        if disparity < FAIR_THRESHOLD {
            FairnessLevel::Fair
        } else if disparity < WARNING_THRESHOLD {
            FairnessLevel::Warning
        } else {
            FairnessLevel::HighDisparity
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FairnessLevel::Fair => "Fair",
            FairnessLevel::Warning => "Warning",
            FairnessLevel::HighDisparity => "High disparity",
        }
    }

    /// Longer wording shown next to a metric in the dashboard.
    pub const fn description(self) -> &'static str {
        match self {
            FairnessLevel::Fair => "Fair",
            FairnessLevel::Warning => "Warning: noticeable disparity",
            FairnessLevel::HighDisparity => "High disparity: potential unfairness",
        }
    }

    pub const fn tone(self) -> &'static str {
        match self {
            FairnessLevel::Fair => "success",
            FairnessLevel::Warning => "warning",
            FairnessLevel::HighDisparity => "danger",
        }
    }
}

/// Categorical attributes a shortlist can be audited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedAttribute {
    /// Name-inferred gender; `unknown` stays a group of its own.
    Gender,
    Country,
    AgeBand,
}

impl ProtectedAttribute {
    pub const ALL: [ProtectedAttribute; 3] = [
        ProtectedAttribute::Gender,
        ProtectedAttribute::Country,
        ProtectedAttribute::AgeBand,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ProtectedAttribute::Gender => "gender",
            ProtectedAttribute::Country => "country",
            ProtectedAttribute::AgeBand => "age",
        }
    }

    /// Group value for `applicant`, or `None` when the attribute is absent.
    pub fn group_of(self, applicant: &Applicant) -> Option<String> {
        match self {
            ProtectedAttribute::Gender => Some(applicant.gender.label().to_string()),
            ProtectedAttribute::Country => applicant.country.clone(),
            ProtectedAttribute::AgeBand => applicant
                .age_band()
                .map(|band| band.label().to_string()),
        }
    }
}

/// Numeric attributes compared by mean shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericAttribute {
    FinalScore,
    Age,
}

impl NumericAttribute {
    pub const fn label(self) -> &'static str {
        match self {
            NumericAttribute::FinalScore => "final_score",
            NumericAttribute::Age => "age",
        }
    }

    pub fn value_of(self, applicant: &Applicant) -> Option<f64> {
        match self {
            NumericAttribute::FinalScore => applicant.final_score,
            NumericAttribute::Age => applicant.age.map(f64::from),
        }
    }
}

/// Mark which members of `population` appear in `selected`.
pub fn selection_mask(population: &[Applicant], selected: &[String]) -> Vec<bool> {
    let chosen: HashSet<&str> = selected.iter().map(String::as_str).collect();
    population
        .iter()
        .map(|applicant| chosen.contains(applicant.name.as_str()))
        .collect()
}
