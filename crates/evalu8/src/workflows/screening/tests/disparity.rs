use super::common::*;
use crate::workflows::screening::disparity::{
    categorical_disparity, numeric_disparity, selection_mask, selection_rates, FairnessLevel,
    NumericAttribute, ProtectedAttribute,
};
use crate::workflows::screening::domain::{Applicant, Gender};

fn two_country_population() -> Vec<Applicant> {
    vec![
        in_country(applicant("A1", Some(90.0), Gender::Male), "A"),
        in_country(applicant("A2", Some(85.0), Gender::Female), "A"),
        in_country(applicant("B1", Some(70.0), Gender::Male), "B"),
        in_country(applicant("B2", Some(65.0), Gender::Female), "B"),
    ]
}

#[test]
fn selection_drawn_from_one_of_two_even_groups_has_half_parity_gap() {
    let population = two_country_population();
    let mask = [true, true, false, false];

    let disparity = categorical_disparity(&population, &mask, ProtectedAttribute::Country)
        .expect("groups observed");

    assert_eq!(disparity.parity_disparity, 0.5);
    assert_eq!(disparity.baseline_disparity, 0.5);
    assert_eq!(disparity.selected_percentages["A"], 100.0);
    assert_eq!(disparity.selected_percentages["B"], 0.0);
    assert_eq!(disparity.population_percentages["A"], 50.0);
    assert_eq!(disparity.level(), FairnessLevel::HighDisparity);
}

#[test]
fn mirrored_selection_is_fair() {
    let population = two_country_population();
    let mask = [true, false, true, false];

    let disparity = categorical_disparity(&population, &mask, ProtectedAttribute::Country)
        .expect("groups observed");

    assert_eq!(disparity.parity_disparity, 0.0);
    assert_eq!(disparity.baseline_disparity, 0.0);
    assert_eq!(disparity.level(), FairnessLevel::Fair);
}

#[test]
fn unknown_gender_is_its_own_group() {
    let population = vec![
        applicant("M", Some(80.0), Gender::Male),
        applicant("F", Some(80.0), Gender::Female),
        applicant("U", Some(80.0), Gender::Unknown),
    ];
    let mask = [false, false, true];

    let disparity = categorical_disparity(&population, &mask, ProtectedAttribute::Gender)
        .expect("groups observed");

    let groups: Vec<&str> = disparity.groups().collect();
    assert_eq!(groups, vec!["female", "male", "unknown"]);
    assert_eq!(disparity.selected_percentages["unknown"], 100.0);
    assert!((disparity.parity_disparity - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn absent_values_are_excluded_from_groups_and_shares() {
    let mut population = two_country_population();
    let mut stateless = applicant("Stateless", Some(99.0), Gender::Male);
    stateless.country = None;
    population.push(stateless);
    let mask = [true, false, true, false, true];

    let disparity = categorical_disparity(&population, &mask, ProtectedAttribute::Country)
        .expect("groups observed");

    assert_eq!(disparity.selected_percentages.len(), 2);
    assert_eq!(disparity.selected_percentages["A"], 50.0);
    assert_eq!(disparity.population_percentages["B"], 50.0);
}

#[test]
fn empty_selection_reads_zero_for_every_group() {
    let population = two_country_population();
    let mask = [false; 4];

    let disparity = categorical_disparity(&population, &mask, ProtectedAttribute::Country)
        .expect("groups observed");

    assert!(disparity.selected_percentages.values().all(|pct| *pct == 0.0));
    assert_eq!(disparity.baseline_disparity, 0.5);
}

#[test]
fn attribute_without_observations_yields_no_disparity() {
    let population: Vec<Applicant> = two_country_population()
        .into_iter()
        .map(|a| aged(a, None))
        .collect();

    assert!(categorical_disparity(&population, &[true; 4], ProtectedAttribute::AgeBand).is_none());
    assert!(selection_rates(&population, &[true; 4], ProtectedAttribute::AgeBand).is_none());
}

#[test]
fn age_is_audited_in_half_open_bands() {
    let population = vec![
        aged(applicant("Teen", Some(60.0), Gender::Male), Some(19)),
        aged(applicant("Twenty", Some(60.0), Gender::Male), Some(20)),
        aged(applicant("Senior", Some(60.0), Gender::Male), Some(55)),
        aged(applicant("Centenarian", Some(60.0), Gender::Male), Some(100)),
    ];

    let disparity = categorical_disparity(&population, &[true; 4], ProtectedAttribute::AgeBand)
        .expect("bands observed");

    let groups: Vec<&str> = disparity.groups().collect();
    assert_eq!(groups, vec!["20-25", "50+", "<20"]);
}

#[test]
fn numeric_disparity_normalizes_by_sample_deviation() {
    let population = vec![
        applicant("Low", Some(70.0), Gender::Male),
        applicant("Mid", Some(80.0), Gender::Female),
        applicant("High", Some(90.0), Gender::Male),
    ];
    let mask = [false, false, true];

    let disparity = numeric_disparity(&population, &mask, NumericAttribute::FinalScore)
        .expect("scores present");

    assert_eq!(disparity.population_mean, 80.0);
    assert_eq!(disparity.selected_mean, 90.0);
    assert!((disparity.disparity - 1.0).abs() < 1e-12);
    assert_eq!(disparity.level(), FairnessLevel::HighDisparity);
}

#[test]
fn flat_population_substitutes_unit_deviation() {
    let population = vec![
        applicant("One", Some(50.0), Gender::Male),
        applicant("Two", Some(50.0), Gender::Female),
    ];

    let disparity = numeric_disparity(&population, &[true, false], NumericAttribute::FinalScore)
        .expect("scores present");

    assert_eq!(disparity.disparity, 0.0);
    assert_eq!(disparity.level(), FairnessLevel::Fair);
}

#[test]
fn numeric_disparity_skips_absent_scores() {
    let population = vec![
        applicant("Scored", Some(60.0), Gender::Male),
        applicant("Unscored", None, Gender::Female),
        applicant("Also Scored", Some(80.0), Gender::Male),
    ];

    let disparity = numeric_disparity(&population, &[true, true, false], NumericAttribute::FinalScore)
        .expect("scores present");
    assert_eq!(disparity.population_mean, 70.0);
    assert_eq!(disparity.selected_mean, 60.0);

    assert!(
        numeric_disparity(&population, &[false, true, false], NumericAttribute::FinalScore)
            .is_none()
    );
}

#[test]
fn selection_rates_flag_four_fifths_violations() {
    let mut population = two_country_population();
    population.push(in_country(applicant("A3", Some(60.0), Gender::Male), "A"));
    population.push(in_country(applicant("A4", Some(60.0), Gender::Male), "A"));
    population.push(in_country(applicant("B3", Some(60.0), Gender::Male), "B"));
    population.push(in_country(applicant("B4", Some(60.0), Gender::Male), "B"));
    let mask = [true, true, true, false, false, false, false, false];

    let rates = selection_rates(&population, &mask, ProtectedAttribute::Country)
        .expect("groups observed");

    assert_eq!(rates.rates["A"], 0.5);
    assert_eq!(rates.rates["B"], 0.25);
    assert_eq!(rates.parity_difference, 0.25);
    assert_eq!(rates.impact_ratio, Some(0.5));
    assert!(!rates.four_fifths_compliant);
}

#[test]
fn nobody_selected_has_no_impact_ratio() {
    let population = two_country_population();
    let rates = selection_rates(&population, &[false; 4], ProtectedAttribute::Country)
        .expect("groups observed");

    assert_eq!(rates.impact_ratio, None);
    assert_eq!(rates.parity_difference, 0.0);
    assert!(rates.four_fifths_compliant);
}

#[test]
fn mask_marks_selected_names_in_population_order() {
    let population = two_country_population();
    let mask = selection_mask(&population, &["B2".to_string(), "A1".to_string()]);
    assert_eq!(mask, vec![true, false, false, true]);
}
