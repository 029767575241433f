//! Units of measure
//!
//! The fixed set of units a product can be measured in, and conversions
//! between units of the same category.

pub mod converter;
pub mod measure;

pub use converter::{convert_quantity, factor_between};
pub use measure::{UnitCategory, UnitMeasure};
