//! ComparaPreco MCP Server Implementation
//!
//! Implements the MCP server with all comparison, catalog and settings tools.

use std::path::PathBuf;
use std::sync::{Arc, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::comparison::{CandidateId, Comparison};
use crate::db::Database;
use crate::preferences::PreferenceContext;
use crate::tools::catalog;
use crate::tools::comparison::{self, SaveTarget};
use crate::tools::settings;
use crate::tools::status::StatusTracker;

/// ComparaPreco MCP Service
#[derive(Clone)]
pub struct ComparaPrecoService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    preferences: PreferenceContext,
    /// The one comparison session of this server process
    session: Arc<std::sync::Mutex<Comparison>>,
    tool_router: ToolRouter<ComparaPrecoService>,
}

impl ComparaPrecoService {
    pub fn new(database_path: PathBuf, database: Database, preferences: PreferenceContext) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            preferences,
            session: Arc::new(std::sync::Mutex::new(Comparison::new())),
            tool_router: Self::tool_router(),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Comparison>, McpError> {
        self.session
            .lock()
            .map_err(|_| McpError::internal_error("Comparison session lock poisoned", None))
    }
}

/// Serialize a tool response as pretty JSON text content
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Comparison Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateCandidateParams {
    /// Candidate ID
    pub id: CandidateId,
    /// Field to change: name, price or quantity
    pub field: String,
    /// New text value, e.g. "3,50" (comma or dot as decimal separator)
    pub value: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetComparisonUnitParams {
    /// Unit: ml, L, g, kg, un, m or cm
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveComparisonParams {
    /// Existing product ID to append to (provide either product_id OR name + category_id)
    pub product_id: Option<i64>,
    /// Name for a new product
    pub name: Option<String>,
    /// Category ID for a new product
    pub category_id: Option<i64>,
    /// Store where the prices were seen (optional)
    pub store: Option<String>,
    /// Notes for every saved presentation (defaults to the candidate name)
    pub notes: Option<String>,
}

// ============================================================================
// Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCategoryParams {
    /// Category name (unique, case-insensitive)
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListProductsParams {
    /// Only products in this category (optional)
    pub category_id: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProductParams {
    /// Product name
    pub name: String,
    /// Category ID
    pub category_id: i64,
    /// Unit the product is measured in: ml, L, g, kg, un, m or cm
    pub unit_measure: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProductIdParams {
    /// Product ID
    pub product_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProductPresentationParams {
    /// Product ID
    pub product_id: i64,
    /// Package price
    pub price: f64,
    /// Package quantity, in the product's unit
    pub quantity: f64,
    /// Store (optional)
    pub store: Option<String>,
    /// Notes (optional)
    pub notes: Option<String>,
}

// ============================================================================
// Settings Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClearDataParams {
    /// Must be true to actually delete data
    #[serde(default)]
    pub force: bool,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl ComparaPrecoService {
    // --- Status ---

    #[tool(description = "Get the current status of the ComparaPreco service including build info, database status, and process information")]
    async fn comparapreco_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status())
    }

    #[tool(description = "Get step-by-step instructions for comparing unit prices. Call this when starting a comparison or when unsure how the comparison tools work.")]
    fn comparison_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::COMPARISON_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(COMPARISON_INSTRUCTIONS)]))
    }

    // --- Comparison ---

    #[tool(description = "Show the current comparison: candidates, their unit values and the best value")]
    fn get_comparison(&self) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        json_result(&comparison::get_comparison(&session))
    }

    #[tool(description = "Set a candidate's name, price or quantity. Values are text; '3,50' and '3.50' are both accepted.")]
    fn update_candidate(&self, Parameters(p): Parameters<UpdateCandidateParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = comparison::update_candidate(&mut session, p.id, &p.field, &p.value)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add a blank candidate to the comparison")]
    fn add_candidate(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = comparison::add_candidate(&mut session).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Start a new comparison with a single blank candidate")]
    fn reset_comparison(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        json_result(&comparison::reset_comparison(&mut session))
    }

    #[tool(description = "Set the unit quantities are entered in (ml, L, g, kg, un)")]
    fn set_comparison_unit(&self, Parameters(p): Parameters<SetComparisonUnitParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = comparison::set_comparison_unit(&mut session, &p.unit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Save every priced candidate as a presentation of a product. Provide product_id for an existing product, or name + category_id to create one. Appends; never overwrites.")]
    fn save_comparison(&self, Parameters(p): Parameters<SaveComparisonParams>) -> Result<CallToolResult, McpError> {
        let target = match (p.product_id, p.name, p.category_id) {
            (Some(product_id), None, None) => SaveTarget::Existing { product_id },
            (None, Some(name), Some(category_id)) => SaveTarget::New { name, category_id },
            _ => {
                return Err(McpError::invalid_params(
                    "Provide either product_id, or name and category_id",
                    None,
                ))
            }
        };

        let session = self.session()?.clone();
        let result = comparison::save_comparison(&self.database, &session, target, p.store, p.notes)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Catalog ---

    #[tool(description = "List product categories with their product counts")]
    fn list_categories(&self) -> Result<CallToolResult, McpError> {
        let result = catalog::list_categories(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Create a new product category")]
    fn add_category(&self, Parameters(p): Parameters<AddCategoryParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::add_category(&self.database, &p.name).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List products, optionally filtered by category")]
    fn list_products(&self, Parameters(p): Parameters<ListProductsParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::list_products(&self.database, p.category_id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Create a new product in a category with a unit of measure")]
    fn add_product(&self, Parameters(p): Parameters<AddProductParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::add_product(&self.database, &p.name, p.category_id, &p.unit_measure)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List a product's stored presentations (newest first) with unit values and the best value")]
    fn list_product_presentations(&self, Parameters(p): Parameters<ProductIdParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::list_product_presentations(&self.database, p.product_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Record a presentation (price and quantity) for a product")]
    fn add_product_presentation(&self, Parameters(p): Parameters<AddProductPresentationParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::add_product_presentation(&self.database, p.product_id, p.price, p.quantity, p.store, p.notes)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a product with all its presentations and the best value among them")]
    fn get_product_with_presentations(&self, Parameters(p): Parameters<ProductIdParams>) -> Result<CallToolResult, McpError> {
        let result = catalog::get_product_with_presentations(&self.database, p.product_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(product) => json_result(&product),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Product not found", "id": {}}}"#,
                p.product_id
            ))])),
        }
    }

    // --- Settings ---

    #[tool(description = "Get the current theme (light or dark) and its color palette")]
    fn get_theme(&self) -> Result<CallToolResult, McpError> {
        json_result(&settings::get_theme(&self.preferences))
    }

    #[tool(description = "Switch between light and dark theme and remember the choice")]
    async fn toggle_theme(&self) -> Result<CallToolResult, McpError> {
        let result = settings::toggle_theme(&self.preferences, &self.database).await;
        json_result(&result)
    }

    #[tool(description = "Delete all products, presentations and user-created categories. Default categories are kept. Requires force=true.")]
    fn clear_data(&self, Parameters(p): Parameters<ClearDataParams>) -> Result<CallToolResult, McpError> {
        let result = settings::clear_data(&self.database, p.force).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Ok(success) => json_result(&success),
            Err(blocked) => json_result(&blocked),
        }
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for ComparaPrecoService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "comparapreco".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("ComparaPreco".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "ComparaPreco - compare unit prices of product presentations. \
                 IMPORTANT: Call comparison_instructions before the first comparison. \
                 Comparison: get_comparison, update_candidate, add_candidate, reset_comparison, \
                 set_comparison_unit, save_comparison. \
                 Catalog: list/add_category, list/add_product, list/add_product_presentation, \
                 get_product_with_presentations. \
                 Settings: get_theme, toggle_theme, clear_data (requires force=true). \
                 Status: comparapreco_status."
                    .into(),
            ),
        }
    }
}
