use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::workflows::screening::domain::{Applicant, Gender};

pub(super) fn applicant(name: &str, score: Option<f64>, gender: Gender) -> Applicant {
    Applicant {
        name: name.to_string(),
        age: Some(30),
        country: Some("Germany".to_string()),
        final_score: score,
        gender,
    }
}

pub(super) fn in_country(mut applicant: Applicant, country: &str) -> Applicant {
    applicant.country = Some(country.to_string());
    applicant
}

pub(super) fn aged(mut applicant: Applicant, age: Option<u32>) -> Applicant {
    applicant.age = age;
    applicant
}

/// Eight male, eight female and three unknown-gender applicants with distinct scores.
///
/// Scores interleave genders so quota passes have to skip over the over-represented side:
/// unknown applicants hold the three highest scores.
pub(super) fn balanced_pool() -> Vec<Applicant> {
    let mut pool = vec![
        applicant("Robin Unknown", Some(99.0), Gender::Unknown),
        applicant("Sasha Unknown", Some(98.0), Gender::Unknown),
        applicant("Kim Unknown", Some(97.0), Gender::Unknown),
    ];
    for index in 0..8 {
        let base = 90.0 - index as f64 * 2.0;
        pool.push(applicant(
            &format!("Male {index}"),
            Some(base),
            Gender::Male,
        ));
        pool.push(applicant(
            &format!("Female {index}"),
            Some(base - 1.0),
            Gender::Female,
        ));
    }
    pool
}

pub(super) fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub(super) fn names(applicants: &[Applicant]) -> Vec<String> {
    applicants.iter().map(|a| a.name.clone()).collect()
}

pub(super) fn gender_of(pool: &[Applicant], name: &str) -> Gender {
    pool.iter()
        .find(|a| a.name == name)
        .map(|a| a.gender)
        .expect("selected name exists in pool")
}
