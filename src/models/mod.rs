//! Data models
//!
//! Rust structs representing database entities.

mod category;
mod presentation;
mod product;
mod setting;

pub use category::Category;
pub use presentation::{PresentationCreate, ProductPresentation};
pub use product::{Product, ProductCreate};
pub use setting::{Setting, THEME_PREFERENCE_KEY};
