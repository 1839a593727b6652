use rand::Rng;
use serde::Serialize;

use super::disparity::{
    categorical_disparity, numeric_disparity, selection_mask, selection_rates,
    CategoricalDisparity, FairnessLevel, NumericAttribute, NumericDisparity, ProtectedAttribute,
    SelectionRates,
};
use super::domain::Applicant;
use super::robustness::{estimate, RobustnessError, RobustnessReport};
use super::session::ModelRun;
use super::selection::ModelId;

const INFERRED_GENDER_NOTE: &str =
    "gender is inferred from first names; 'unknown' marks names outside the lookup tables";

/// Fairness verdict for one categorical attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeAudit {
    #[serde(flatten)]
    pub disparity: CategoricalDisparity,
    pub level: FairnessLevel,
    pub level_label: &'static str,
    pub selection_rates: Option<SelectionRates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAudit {
    #[serde(flatten)]
    pub disparity: NumericDisparity,
    pub level: FairnessLevel,
    pub level_label: &'static str,
}

/// Complete audit of one model run, shaped for charting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub model: ModelId,
    pub model_description: &'static str,
    pub k: usize,
    pub population: usize,
    pub selected: Vec<String>,
    pub attributes: Vec<AttributeAudit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<ScoreAudit>,
    /// Mean age shift, alongside the age-band audit in `attributes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<ScoreAudit>,
    pub robustness: RobustnessReport,
}

impl AuditReport {
    /// Audit `run` over `population` and re-run its model `robustness_runs` times.
    ///
    /// Attributes nobody in the population carries are left out of the report.
    pub fn build<R: Rng + ?Sized>(
        population: &[Applicant],
        run: &ModelRun,
        robustness_runs: usize,
        rng: &mut R,
    ) -> Result<Self, RobustnessError> {
        let mask = selection_mask(population, &run.selected);

        let attributes = ProtectedAttribute::ALL
            .into_iter()
            .filter_map(|attribute| {
                let disparity = categorical_disparity(population, &mask, attribute)?;
                let level = disparity.level();
                Some(AttributeAudit {
                    level,
                    level_label: level.label(),
                    selection_rates: selection_rates(population, &mask, attribute),
                    note: (attribute == ProtectedAttribute::Gender)
                        .then_some(INFERRED_GENDER_NOTE),
                    disparity,
                })
            })
            .collect();

        let final_score = score_audit(population, &mask, NumericAttribute::FinalScore);
        let age = score_audit(population, &mask, NumericAttribute::Age);

        let robustness = estimate(run.model, population, run.k, robustness_runs, rng)?;

        Ok(Self {
            model: run.model,
            model_description: run.model.description(),
            k: run.k,
            population: population.len(),
            selected: run.selected.clone(),
            attributes,
            final_score,
            age,
            robustness,
        })
    }

    pub fn attribute(&self, attribute: ProtectedAttribute) -> Option<&AttributeAudit> {
        self.attributes
            .iter()
            .find(|audit| audit.disparity.attribute == attribute)
    }

    /// One-line verdicts in the order a reader scans them.
    pub fn findings(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .attributes
            .iter()
            .map(|audit| {
                format!(
                    "{} fairness status: {} (ideal disparity={:.2}, dataset disparity={:.2})",
                    audit.disparity.attribute.label(),
                    audit.level.description(),
                    audit.disparity.parity_disparity,
                    audit.disparity.baseline_disparity
                )
            })
            .collect();

        for (name, audit) in [("final score", &self.final_score), ("age", &self.age)] {
            if let Some(audit) = audit {
                lines.push(format!(
                    "{name} fairness status: {} (selected mean={:.2}, overall mean={:.2}, normalized disparity={:.2})",
                    audit.level.description(),
                    audit.disparity.selected_mean,
                    audit.disparity.population_mean,
                    audit.disparity.disparity
                ));
            }
        }

        lines.push(format!(
            "selection robustness across {} runs: {:.1}% stable, {:.1}% changed",
            self.robustness.runs, self.robustness.stable_pct, self.robustness.changed_pct
        ));
        lines
    }
}

fn score_audit(
    population: &[Applicant],
    mask: &[bool],
    attribute: NumericAttribute,
) -> Option<ScoreAudit> {
    numeric_disparity(population, mask, attribute).map(|disparity| {
        let level = disparity.level();
        ScoreAudit {
            level,
            level_label: level.label(),
            disparity,
        }
    })
}
