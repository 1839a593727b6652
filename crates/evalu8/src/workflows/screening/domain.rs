use serde::{Deserialize, Serialize};

use super::selection::ModelId;

/// Raw intake entry as it appears in an applicant export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawApplicantRecord {
    #[serde(default)]
    pub name: String,
    /// Free-text biography; a missing field reads as an empty biography.
    #[serde(default)]
    pub cv: String,
}

/// Gender category inferred from the applicant's first name.
///
/// This is a name-table heuristic, not a self-reported or biometric attribute. Any fairness
/// figure computed over it inherits the table's blind spots, and `Unknown` is kept as its own
/// group rather than folded into either listed category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

/// Age bucket used when auditing age as a categorical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    Under20,
    From20To25,
    From25To30,
    From30To35,
    From35To40,
    From40To50,
    From50,
}

impl AgeBand {
    /// Half-open bins; ages of 100 and above fall outside every band.
    pub fn from_age(age: u32) -> Option<Self> {
        let band = match age {
            0..=19 => AgeBand::Under20,
            20..=24 => AgeBand::From20To25,
            25..=29 => AgeBand::From25To30,
            30..=34 => AgeBand::From30To35,
            35..=39 => AgeBand::From35To40,
            40..=49 => AgeBand::From40To50,
            50..=99 => AgeBand::From50,
            _ => return None,
        };
        Some(band)
    }

    pub const fn label(self) -> &'static str {
        match self {
            AgeBand::Under20 => "<20",
            AgeBand::From20To25 => "20-25",
            AgeBand::From25To30 => "25-30",
            AgeBand::From30To35 => "30-35",
            AgeBand::From35To40 => "35-40",
            AgeBand::From40To50 => "40-50",
            AgeBand::From50 => "50+",
        }
    }
}

/// Normalized applicant, keyed by `name` within a loaded batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub name: String,
    pub age: Option<u32>,
    pub country: Option<String>,
    pub final_score: Option<f64>,
    pub gender: Gender,
}

impl Applicant {
    pub fn age_band(&self) -> Option<AgeBand> {
        self.age.and_then(AgeBand::from_age)
    }
}

/// Tabular row joining an applicant with the outcome of one model run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedApplicantRow {
    pub name: String,
    pub age: Option<u32>,
    pub age_band: Option<&'static str>,
    pub country: Option<String>,
    pub final_score: Option<f64>,
    pub gender: Gender,
    pub selected: bool,
    pub model: &'static str,
}

impl AugmentedApplicantRow {
    pub fn new(applicant: &Applicant, selected: bool, model: ModelId) -> Self {
        Self {
            name: applicant.name.clone(),
            age: applicant.age,
            age_band: applicant.age_band().map(AgeBand::label),
            country: applicant.country.clone(),
            final_score: applicant.final_score,
            gender: applicant.gender,
            selected,
            model: model.as_str(),
        }
    }
}
