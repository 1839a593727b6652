use once_cell::sync::Lazy;
use regex::Regex;

use super::domain::Gender;

static BIOGRAPHY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"is a (\d+)-year-old .*? from ([A-Za-z ]+?) with a final score of ([0-9]+(?:\.[0-9]+)?)",
    )
    .expect("biography pattern compiles")
});

const MALE_FIRST_NAMES: [&str; 10] = [
    "Alex", "Ben", "Carlos", "David", "Ethan", "Felix", "George", "Hugo", "Ivan", "Jamal",
];

const FEMALE_FIRST_NAMES: [&str; 10] = [
    "Anna", "Bianca", "Clara", "Diana", "Elena", "Fatima", "Grace", "Hana", "Isabel", "Julia",
];

/// Structured fields recovered from a biography. Every field is absent on a miss.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub age: Option<u32>,
    pub country: Option<String>,
    pub final_score: Option<f64>,
}

impl ExtractedFields {
    pub fn is_miss(&self) -> bool {
        self.age.is_none() && self.country.is_none() && self.final_score.is_none()
    }
}

/// Pull age, country and final score out of free biography text.
pub fn extract(biography: &str) -> ExtractedFields {
    let Some(captures) = BIOGRAPHY_PATTERN.captures(biography) else {
        return ExtractedFields::default();
    };

    ExtractedFields {
        age: captures.get(1).and_then(|m| m.as_str().parse().ok()),
        country: captures.get(2).map(|m| m.as_str().to_string()),
        final_score: captures.get(3).and_then(|m| m.as_str().parse().ok()),
    }
}

/// Guess a gender category from the first space-delimited token of `full_name`.
pub fn infer_gender(full_name: &str) -> Gender {
    let first_name = full_name.split(' ').next().unwrap_or_default();

    if MALE_FIRST_NAMES.contains(&first_name) {
        Gender::Male
    } else if FEMALE_FIRST_NAMES.contains(&first_name) {
        Gender::Female
    } else {
        Gender::Unknown
    }
}
