//! Unit conversion functions

use super::measure::UnitMeasure;

/// Multiplier that turns a quantity in `from` into a quantity in `to`
///
/// Returns `None` when the units belong to different categories
/// (e.g. "L" and "kg").
pub fn factor_between(from: UnitMeasure, to: UnitMeasure) -> Option<f64> {
    if from.category() != to.category() {
        return None;
    }
    Some(from.base_factor() / to.base_factor())
}

/// Convert a quantity between units of the same category
///
/// Examples:
/// - 2 L -> 2000 ml
/// - 500 g -> 0.5 kg
/// - 1 kg -> ml is `None`
pub fn convert_quantity(quantity: f64, from: UnitMeasure, to: UnitMeasure) -> Option<f64> {
    if from == to {
        return Some(quantity);
    }
    factor_between(from, to).map(|factor| quantity * factor)
}
