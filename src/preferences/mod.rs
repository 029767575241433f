//! App preferences
//!
//! Theme mode and the context object that publishes it.

pub mod context;
pub mod theme;

pub use context::PreferenceContext;
pub use theme::{ThemeColors, ThemeMode, COLOR_SCHEME_ENV};
