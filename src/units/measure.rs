//! Unit types and conversion constants
//!
//! Provides the enumerated unit set and the factors that relate each unit to
//! the base unit of its category.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Volume units, base is ml
    Volume,
    /// Weight/mass units, base is g
    Weight,
    /// Discrete items, base is un
    Count,
    /// Length units, base is cm
    Length,
}

/// A unit a product quantity is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitMeasure {
    #[default]
    #[serde(rename = "ml")]
    Ml,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "g")]
    G,
    #[serde(rename = "kg")]
    Kg,
    #[serde(rename = "un")]
    Un,
    #[serde(rename = "m")]
    M,
    #[serde(rename = "cm")]
    Cm,
}

// ============================================================================
// Conversion Constants (to the category base unit)
// ============================================================================

/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Centimeters per meter
pub const CM_PER_M: f64 = 100.0;

impl UnitMeasure {
    /// Units offered on the comparison screen, in display order
    pub const SELECTABLE: [UnitMeasure; 5] = [
        UnitMeasure::Ml,
        UnitMeasure::L,
        UnitMeasure::G,
        UnitMeasure::Kg,
        UnitMeasure::Un,
    ];

    /// Every known unit
    pub const ALL: [UnitMeasure; 7] = [
        UnitMeasure::Ml,
        UnitMeasure::L,
        UnitMeasure::G,
        UnitMeasure::Kg,
        UnitMeasure::Un,
        UnitMeasure::M,
        UnitMeasure::Cm,
    ];

    /// Display label, also the database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitMeasure::Ml => "ml",
            UnitMeasure::L => "L",
            UnitMeasure::G => "g",
            UnitMeasure::Kg => "kg",
            UnitMeasure::Un => "un",
            UnitMeasure::M => "m",
            UnitMeasure::Cm => "cm",
        }
    }

    /// Parse from string, case-insensitive, accepting common spellings
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "ml" | "mililitro" | "mililitros" | "milliliter" | "milliliters" => Some(UnitMeasure::Ml),
            "l" | "litro" | "litros" | "liter" | "liters" | "litre" | "litres" => Some(UnitMeasure::L),
            "g" | "grama" | "gramas" | "gram" | "grams" => Some(UnitMeasure::G),
            "kg" | "quilo" | "quilos" | "quilograma" | "quilogramas" | "kilogram" | "kilograms" => {
                Some(UnitMeasure::Kg)
            }
            "un" | "unidade" | "unidades" | "unit" | "units" | "each" | "count" => Some(UnitMeasure::Un),
            "m" | "metro" | "metros" | "meter" | "meters" => Some(UnitMeasure::M),
            "cm" | "centimetro" | "centímetro" | "centimetros" | "centímetros" | "centimeter"
            | "centimeters" => Some(UnitMeasure::Cm),
            _ => None,
        }
    }

    pub fn category(&self) -> UnitCategory {
        match self {
            UnitMeasure::Ml | UnitMeasure::L => UnitCategory::Volume,
            UnitMeasure::G | UnitMeasure::Kg => UnitCategory::Weight,
            UnitMeasure::Un => UnitCategory::Count,
            UnitMeasure::M | UnitMeasure::Cm => UnitCategory::Length,
        }
    }

    /// How many base units one of this unit holds
    pub fn base_factor(&self) -> f64 {
        match self {
            UnitMeasure::Ml | UnitMeasure::G | UnitMeasure::Un | UnitMeasure::Cm => 1.0,
            UnitMeasure::L => ML_PER_LITER,
            UnitMeasure::Kg => G_PER_KG,
            UnitMeasure::M => CM_PER_M,
        }
    }
}

impl fmt::Display for UnitMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
