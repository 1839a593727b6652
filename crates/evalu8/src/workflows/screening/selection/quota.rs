use super::super::domain::{Applicant, Gender};
use super::ranking::rank_by_score;

/// Stages of the gender-balanced allocation, visited in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaPhase {
    /// Take male and female applicants in score order up to `k / 2` each.
    FillingBaseQuota,
    /// For odd `k`, the next male or female applicant in score order takes the spare slot.
    FillingOddSlot,
    /// Remaining slots go to anyone not yet selected, unknown gender included.
    Backfilling,
    Done,
}

/// Gender-balanced top-k allocation driven one phase at a time.
#[derive(Debug)]
pub struct QuotaAllocation<'a> {
    ranked: Vec<&'a Applicant>,
    taken: Vec<bool>,
    selected: Vec<usize>,
    k: usize,
    base_target: usize,
    male: usize,
    female: usize,
    phase: QuotaPhase,
}

impl<'a> QuotaAllocation<'a> {
    pub fn new(applicants: &'a [Applicant], k: usize) -> Self {
        let ranked = rank_by_score(applicants);
        let taken = vec![false; ranked.len()];
        let phase = if k == 0 {
            QuotaPhase::Done
        } else {
            QuotaPhase::FillingBaseQuota
        };

        Self {
            ranked,
            taken,
            selected: Vec::new(),
            k,
            base_target: k / 2,
            male: 0,
            female: 0,
            phase,
        }
    }

    pub fn phase(&self) -> QuotaPhase {
        self.phase
    }

    pub fn male_count(&self) -> usize {
        self.male
    }

    pub fn female_count(&self) -> usize {
        self.female
    }

    /// Names chosen so far, in the order they were taken.
    pub fn selected_names(&self) -> Vec<String> {
        self.selected
            .iter()
            .map(|&index| self.ranked[index].name.clone())
            .collect()
    }

    /// Run the current phase to completion and move to the next one.
    pub fn step(&mut self) -> QuotaPhase {
        self.phase = match self.phase {
            QuotaPhase::FillingBaseQuota => {
                self.fill_base_quota();
                if self.is_full() {
                    QuotaPhase::Done
                } else if self.k % 2 == 1 {
                    QuotaPhase::FillingOddSlot
                } else {
                    QuotaPhase::Backfilling
                }
            }
            QuotaPhase::FillingOddSlot => {
                self.fill_odd_slot();
                if self.is_full() {
                    QuotaPhase::Done
                } else {
                    QuotaPhase::Backfilling
                }
            }
            QuotaPhase::Backfilling => {
                self.backfill();
                QuotaPhase::Done
            }
            QuotaPhase::Done => QuotaPhase::Done,
        };
        self.phase
    }

    pub fn finish(mut self) -> Vec<String> {
        while self.phase != QuotaPhase::Done {
            self.step();
        }
        self.selected_names()
    }

    fn is_full(&self) -> bool {
        self.selected.len() >= self.k
    }

    fn take(&mut self, index: usize) {
        self.taken[index] = true;
        self.selected.push(index);
        match self.ranked[index].gender {
            Gender::Male => self.male += 1,
            Gender::Female => self.female += 1,
            Gender::Unknown => {}
        }
    }

    fn fill_base_quota(&mut self) {
        for index in 0..self.ranked.len() {
            if self.is_full() {
                break;
            }
            let eligible = match self.ranked[index].gender {
                Gender::Male => self.male < self.base_target,
                Gender::Female => self.female < self.base_target,
                Gender::Unknown => false,
            };
            if eligible {
                self.take(index);
            }
        }
    }

    fn fill_odd_slot(&mut self) {
        let candidate = (0..self.ranked.len()).find(|&index| {
            !self.taken[index] && self.ranked[index].gender != Gender::Unknown
        });
        if let Some(index) = candidate {
            self.take(index);
        }
    }

    fn backfill(&mut self) {
        for index in 0..self.ranked.len() {
            if self.is_full() {
                break;
            }
            if !self.taken[index] {
                self.take(index);
            }
        }
    }
}

pub(crate) fn quota_balanced_top_k(applicants: &[Applicant], k: usize) -> Vec<String> {
    QuotaAllocation::new(applicants, k).finish()
}
