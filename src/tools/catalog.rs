//! Catalog MCP Tools
//!
//! Tools for categories, products and their stored presentations.

use serde::Serialize;

use crate::comparison::{format_unit_value, lowest_value};
use crate::db::Database;
use crate::models::{
    Category, PresentationCreate, Product, ProductCreate, ProductPresentation,
};
use crate::units::UnitMeasure;

/// Category with usage count
#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub product_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategorySummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct AddCategoryResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub products: Vec<Product>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    pub id: i64,
    pub name: String,
    pub category_name: Option<String>,
    pub unit_measure: UnitMeasure,
    pub created_at: String,
}

/// Stored presentation annotated with its unit value
#[derive(Debug, Serialize)]
pub struct PresentationDetail {
    pub id: i64,
    pub price: f64,
    pub quantity: f64,
    pub unit_value: Option<f64>,
    pub unit_value_display: String,
    pub is_best_value: bool,
    pub store: Option<String>,
    pub date: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListPresentationsResponse {
    pub product_id: i64,
    pub unit_measure: UnitMeasure,
    pub presentations: Vec<PresentationDetail>,
    pub best_value_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AddPresentationResponse {
    pub id: i64,
    pub product_id: i64,
    pub unit_value: Option<f64>,
    pub unit_value_display: String,
    pub date: String,
}

/// Full product detail with ranked presentations
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub unit_measure: UnitMeasure,
    pub created_at: String,
    pub presentations: Vec<PresentationDetail>,
    pub best_value_id: Option<i64>,
}

/// Annotate presentations with unit values and mark the cheapest one
///
/// Same rule as the comparison screen: nothing is marked until at least two
/// presentations have a unit value.
fn rank_presentations(
    presentations: Vec<ProductPresentation>,
    unit: UnitMeasure,
) -> (Vec<PresentationDetail>, Option<i64>) {
    let best = lowest_value(presentations.iter().map(|p| (p.id, p.unit_value())));

    let details = presentations
        .into_iter()
        .map(|p| {
            let unit_value = p.unit_value();
            PresentationDetail {
                id: p.id,
                price: p.price,
                quantity: p.quantity,
                unit_value,
                unit_value_display: format_unit_value(unit_value, unit),
                is_best_value: best == Some(p.id),
                store: p.store,
                date: p.date,
                notes: p.notes,
            }
        })
        .collect();

    (details, best)
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Validate that a stored amount is a positive finite number
pub(crate) fn validate_amount(label: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{} must be a number greater than 0", label));
    }
    Ok(())
}

/// List all categories with product counts
pub fn list_categories(db: &Database) -> Result<ListCategoriesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let categories = Category::list(&conn)
        .map_err(|e| format!("Failed to list categories: {}", e))?;

    let mut summaries = Vec::with_capacity(categories.len());
    for category in categories {
        let product_count = Category::product_count(&conn, category.id)
            .map_err(|e| format!("Failed to count products: {}", e))?;
        summaries.push(CategorySummary {
            id: category.id,
            name: category.name,
            product_count,
        });
    }

    let total = summaries.len();
    Ok(ListCategoriesResponse {
        categories: summaries,
        total,
    })
}

/// Add a new category (names are unique, case-insensitive)
pub fn add_category(db: &Database, name: &str) -> Result<AddCategoryResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Category name cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if let Some(existing) = Category::get_by_name(&conn, name)
        .map_err(|e| format!("Database error: {}", e))?
    {
        return Err(format!(
            "Category '{}' already exists with id: {}",
            existing.name, existing.id
        ));
    }

    let category = Category::create(&conn, name)
        .map_err(|e| format!("Failed to create category: {}", e))?;

    Ok(AddCategoryResponse {
        id: category.id,
        name: category.name,
        created_at: category.created_at,
    })
}

/// List products, optionally within one category
pub fn list_products(db: &Database, category_id: Option<i64>) -> Result<ListProductsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let products = Product::list(&conn, category_id)
        .map_err(|e| format!("Failed to list products: {}", e))?;

    let total = products.len();
    Ok(ListProductsResponse { products, total })
}

/// Add a new product
pub fn add_product(
    db: &Database,
    name: &str,
    category_id: i64,
    unit_measure: &str,
) -> Result<AddProductResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Product name cannot be empty".to_string());
    }
    let unit = UnitMeasure::from_str(unit_measure)
        .ok_or_else(|| format!("Unknown unit of measure: '{}'", unit_measure))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Category::get_by_id(&conn, category_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Category not found with id: {}", category_id));
    }

    let product = Product::create(
        &conn,
        &ProductCreate {
            name: name.to_string(),
            category_id,
            unit_measure: unit,
        },
    )
    .map_err(|e| format!("Failed to create product: {}", e))?;

    Ok(AddProductResponse {
        id: product.id,
        name: product.name,
        category_name: product.category_name,
        unit_measure: product.unit_measure,
        created_at: product.created_at,
    })
}

/// List a product's presentations, newest first, with the best value marked
pub fn list_product_presentations(
    db: &Database,
    product_id: i64,
) -> Result<ListPresentationsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let product = Product::get_by_id(&conn, product_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Product not found with id: {}", product_id))?;

    let presentations = ProductPresentation::list_for_product(&conn, product_id)
        .map_err(|e| format!("Failed to list presentations: {}", e))?;

    let (presentations, best_value_id) = rank_presentations(presentations, product.unit_measure);

    Ok(ListPresentationsResponse {
        product_id,
        unit_measure: product.unit_measure,
        presentations,
        best_value_id,
    })
}

/// Record a presentation (price + quantity) for a product
pub fn add_product_presentation(
    db: &Database,
    product_id: i64,
    price: f64,
    quantity: f64,
    store: Option<String>,
    notes: Option<String>,
) -> Result<AddPresentationResponse, String> {
    validate_amount("price", price)?;
    validate_amount("quantity", quantity)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let product = Product::get_by_id(&conn, product_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Product not found with id: {}", product_id))?;

    let presentation = ProductPresentation::create(
        &conn,
        &PresentationCreate {
            product_id,
            price,
            quantity,
            store: clean_optional(store),
            date: None,
            notes: clean_optional(notes),
        },
    )
    .map_err(|e| format!("Failed to create presentation: {}", e))?;

    let unit_value = presentation.unit_value();
    Ok(AddPresentationResponse {
        id: presentation.id,
        product_id,
        unit_value,
        unit_value_display: format_unit_value(unit_value, product.unit_measure),
        date: presentation.date,
    })
}

/// Get a product with all of its presentations
pub fn get_product_with_presentations(
    db: &Database,
    product_id: i64,
) -> Result<Option<ProductDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let product = Product::get_with_presentations(&conn, product_id)
        .map_err(|e| format!("Failed to get product: {}", e))?;

    Ok(product.map(|product| {
        let (presentations, best_value_id) =
            rank_presentations(product.presentations.unwrap_or_default(), product.unit_measure);
        ProductDetail {
            id: product.id,
            name: product.name,
            category_id: product.category_id,
            category_name: product.category_name,
            unit_measure: product.unit_measure,
            created_at: product.created_at,
            presentations,
            best_value_id,
        }
    }))
}
