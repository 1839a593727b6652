use std::cmp::Ordering;

use super::super::domain::{Applicant, Gender};

/// Country the regional model restricts its shortlist to.
pub const TARGET_COUNTRY: &str = "Netherlands";

/// Stable descending sort by score; unscored applicants trail in input order.
pub fn rank_by_score<'a, I>(applicants: I) -> Vec<&'a Applicant>
where
    I: IntoIterator<Item = &'a Applicant>,
{
    let mut ranked: Vec<&Applicant> = applicants.into_iter().collect();
    ranked.sort_by(|a, b| compare_scores(a.final_score, b.final_score));
    ranked
}

fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(crate) fn top_names<'a, I>(ranked: I, k: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a Applicant>,
{
    ranked
        .into_iter()
        .take(k)
        .map(|applicant| applicant.name.clone())
        .collect()
}

pub(crate) fn ranked_top_k(applicants: &[Applicant], k: usize) -> Vec<String> {
    top_names(rank_by_score(applicants), k)
}

pub(crate) fn country_filtered_top_k(applicants: &[Applicant], k: usize) -> Vec<String> {
    let eligible = applicants
        .iter()
        .filter(|applicant| applicant.country.as_deref() == Some(TARGET_COUNTRY));
    top_names(rank_by_score(eligible), k)
}

pub(crate) fn male_filtered_top_k(applicants: &[Applicant], k: usize) -> Vec<String> {
    let eligible = applicants
        .iter()
        .filter(|applicant| applicant.gender == Gender::Male);
    top_names(rank_by_score(eligible), k)
}
