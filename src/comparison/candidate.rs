//! Candidate model
//!
//! One product presentation under comparison. Price and quantity are kept
//! exactly as typed; the unit value is derived from them on every read.

use serde::{Deserialize, Serialize};

use super::decimal::compute_unit_value;

/// Identifier of a candidate within one comparison session
pub type CandidateId = u32;

/// Editable field of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateField {
    Name,
    Price,
    Quantity,
}

impl CandidateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateField::Name => "name",
            CandidateField::Price => "price",
            CandidateField::Quantity => "quantity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(CandidateField::Name),
            "price" => Some(CandidateField::Price),
            "quantity" => Some(CandidateField::Quantity),
            _ => None,
        }
    }
}

/// A product presentation being compared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub price: String,
    pub quantity: String,
}

impl Candidate {
    /// A blank candidate with the default "Produto {id}" label
    pub fn new(id: CandidateId) -> Self {
        Self {
            id,
            name: default_name(id),
            price: String::new(),
            quantity: String::new(),
        }
    }

    /// Price per unit, or `None` when price/quantity don't allow one
    pub fn unit_value(&self) -> Option<f64> {
        compute_unit_value(&self.price, &self.quantity)
    }

    /// Copy of this candidate with one field replaced
    pub fn with_field(&self, field: CandidateField, value: &str) -> Self {
        let mut updated = self.clone();
        match field {
            CandidateField::Name => updated.name = value.to_string(),
            CandidateField::Price => updated.price = value.to_string(),
            CandidateField::Quantity => updated.quantity = value.to_string(),
        }
        updated
    }
}

pub fn default_name(id: CandidateId) -> String {
    format!("Produto {}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_candidate_is_blank() {
        let c = Candidate::new(3);
        assert_eq!(c.id, 3);
        assert_eq!(c.name, "Produto 3");
        assert!(c.price.is_empty());
        assert!(c.quantity.is_empty());
        assert_eq!(c.unit_value(), None);
    }

    #[test]
    fn test_unit_value_follows_fields() {
        let c = Candidate::new(1)
            .with_field(CandidateField::Price, "10,00")
            .with_field(CandidateField::Quantity, "2");
        assert_eq!(c.unit_value(), Some(5.0));

        let c = c.with_field(CandidateField::Quantity, "4");
        assert_eq!(c.unit_value(), Some(2.5));

        let c = c.with_field(CandidateField::Price, "");
        assert_eq!(c.unit_value(), None);
    }

    #[test]
    fn test_price_is_stored_unnormalized() {
        let c = Candidate::new(1).with_field(CandidateField::Price, "3,50");
        assert_eq!(c.price, "3,50");
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!(CandidateField::from_str("price"), Some(CandidateField::Price));
        assert_eq!(CandidateField::from_str("Quantity"), Some(CandidateField::Quantity));
        assert_eq!(CandidateField::from_str("name"), Some(CandidateField::Name));
        assert_eq!(CandidateField::from_str("unitValue"), None);
    }
}
