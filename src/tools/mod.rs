//! ComparaPreco Tools module
//!
//! MCP tool implementations.

pub mod catalog;
pub mod comparison;
pub mod settings;
pub mod status;
