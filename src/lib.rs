//! ComparaPreco Library
//!
//! Unit-price comparison of product presentations, with a small SQLite
//! catalog for keeping price history.

pub mod build_info;
pub mod comparison;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod preferences;
pub mod tools;
pub mod units;
