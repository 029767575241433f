//! Comparison session
//!
//! Holds the candidate list and selected unit between user actions. All
//! mutations go through the pure functions in the parent module and swap in
//! the returned list.

use serde::Serialize;

use super::candidate::{Candidate, CandidateField, CandidateId};
use super::decimal::format_unit_value;
use super::{add_candidate, best_value_id, reset_comparison, update_candidate};
use crate::units::UnitMeasure;

/// One candidate as shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub id: CandidateId,
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub unit_value: Option<f64>,
    pub unit_value_display: String,
    pub is_best_value: bool,
}

/// A rendered comparison: candidates plus the highlighted best value
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSnapshot {
    pub unit: UnitMeasure,
    pub candidates: Vec<CandidateView>,
    pub best_value_id: Option<CandidateId>,
}

/// A running comparison
#[derive(Debug, Clone)]
pub struct Comparison {
    candidates: Vec<Candidate>,
    unit: UnitMeasure,
}

impl Default for Comparison {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparison {
    pub fn new() -> Self {
        Self {
            candidates: reset_comparison(),
            unit: UnitMeasure::default(),
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn unit(&self) -> UnitMeasure {
        self.unit
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Set one field of a candidate. Returns false if no candidate has `id`.
    pub fn update(&mut self, id: CandidateId, field: CandidateField, value: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.candidates = update_candidate(&self.candidates, id, field, value);
        true
    }

    /// Append a blank candidate, returning its id
    ///
    /// `None` when the id space is used up.
    pub fn add(&mut self) -> Option<CandidateId> {
        let before = self.candidates.len();
        self.candidates = add_candidate(&self.candidates);
        if self.candidates.len() == before {
            return None;
        }
        self.candidates.last().map(|c| c.id)
    }

    /// Start over with a single blank candidate; the selected unit is kept
    pub fn reset(&mut self) {
        self.candidates = reset_comparison();
    }

    pub fn set_unit(&mut self, unit: UnitMeasure) {
        self.unit = unit;
    }

    pub fn best_value_id(&self) -> Option<CandidateId> {
        best_value_id(&self.candidates)
    }

    pub fn snapshot(&self) -> ComparisonSnapshot {
        let best = self.best_value_id();
        let candidates = self
            .candidates
            .iter()
            .map(|c| {
                let unit_value = c.unit_value();
                CandidateView {
                    id: c.id,
                    name: c.name.clone(),
                    price: c.price.clone(),
                    quantity: c.quantity.clone(),
                    unit_value,
                    unit_value_display: format_unit_value(unit_value, self.unit),
                    is_best_value: best == Some(c.id),
                }
            })
            .collect();

        ComparisonSnapshot {
            unit: self.unit,
            candidates,
            best_value_id: best,
        }
    }
}
