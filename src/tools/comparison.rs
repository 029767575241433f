//! Comparison MCP Tools
//!
//! Tools driving the in-memory comparison session, and saving it to the
//! catalog.

use serde::Serialize;

use crate::comparison::session::ComparisonSnapshot;
use crate::comparison::{parse_decimal, CandidateField, CandidateId, Comparison};
use crate::db::Database;
use crate::models::{Category, PresentationCreate, Product, ProductCreate, ProductPresentation};
use crate::units::{convert_quantity, UnitMeasure};

/// Response for add_candidate
#[derive(Debug, Serialize)]
pub struct AddCandidateResponse {
    pub id: CandidateId,
    pub comparison: ComparisonSnapshot,
}

/// Where a saved comparison goes
#[derive(Debug, Clone)]
pub enum SaveTarget {
    /// Append to an existing product
    Existing { product_id: i64 },
    /// Create a product measured in the session's unit
    New { name: String, category_id: i64 },
}

/// One candidate written as a presentation
#[derive(Debug, Serialize)]
pub struct SavedPresentation {
    pub candidate_id: CandidateId,
    pub presentation_id: i64,
    pub price: f64,
    /// Quantity in the product's unit
    pub quantity: f64,
}

/// Response for save_comparison
#[derive(Debug, Serialize)]
pub struct SaveComparisonResponse {
    pub success: bool,
    pub product_id: i64,
    pub product_name: String,
    pub created_product: bool,
    pub unit_measure: UnitMeasure,
    pub saved: Vec<SavedPresentation>,
    /// Candidates left out because price or quantity was missing or invalid
    pub skipped_candidates: Vec<CandidateId>,
}

/// Current state of the comparison
pub fn get_comparison(session: &Comparison) -> ComparisonSnapshot {
    session.snapshot()
}

/// Set a candidate's name, price or quantity
pub fn update_candidate(
    session: &mut Comparison,
    id: CandidateId,
    field: &str,
    value: &str,
) -> Result<ComparisonSnapshot, String> {
    let field = CandidateField::from_str(field).ok_or_else(|| {
        format!("Unknown field '{}': expected name, price or quantity", field)
    })?;

    if !session.update(id, field, value) {
        return Err(format!("Candidate not found with id: {}", id));
    }

    Ok(session.snapshot())
}

/// Append a blank candidate
pub fn add_candidate(session: &mut Comparison) -> Result<AddCandidateResponse, String> {
    let id = session
        .add()
        .ok_or_else(|| "No candidate ids left: reset the comparison".to_string())?;
    Ok(AddCandidateResponse {
        id,
        comparison: session.snapshot(),
    })
}

/// Start a new comparison
pub fn reset_comparison(session: &mut Comparison) -> ComparisonSnapshot {
    session.reset();
    session.snapshot()
}

/// Change the unit quantities are entered in
pub fn set_comparison_unit(session: &mut Comparison, unit: &str) -> Result<ComparisonSnapshot, String> {
    let unit = UnitMeasure::from_str(unit).ok_or_else(|| {
        let offered: Vec<&str> = UnitMeasure::SELECTABLE.iter().map(|u| u.as_str()).collect();
        let extra: Vec<&str> = UnitMeasure::ALL
            .iter()
            .filter(|u| !UnitMeasure::SELECTABLE.contains(*u))
            .map(|u| u.as_str())
            .collect();
        format!(
            "Unknown unit '{}': expected one of {} (also accepted: {})",
            unit,
            offered.join(", "),
            extra.join(", ")
        )
    })?;

    session.set_unit(unit);
    Ok(session.snapshot())
}

/// Price and quantity of a candidate that can be stored (both > 0)
fn storable_amounts(price: &str, quantity: &str) -> Option<(f64, f64)> {
    let price = parse_decimal(price)?;
    let quantity = parse_decimal(quantity)?;
    if price > 0.0 && quantity > 0.0 {
        Some((price, quantity))
    } else {
        None
    }
}

/// Append every priced candidate as a presentation of a product
///
/// Nothing is deduplicated or overwritten: each save adds to the product's
/// price history. Quantities are converted from the session unit to the
/// product's unit. The save is all-or-nothing.
pub fn save_comparison(
    db: &Database,
    session: &Comparison,
    target: SaveTarget,
    store: Option<String>,
    notes: Option<String>,
) -> Result<SaveComparisonResponse, String> {
    let mut to_save = Vec::new();
    let mut skipped_candidates = Vec::new();
    for candidate in session.candidates() {
        match storable_amounts(&candidate.price, &candidate.quantity) {
            Some((price, quantity)) => to_save.push((candidate, price, quantity)),
            None => skipped_candidates.push(candidate.id),
        }
    }

    if to_save.is_empty() {
        return Err("Nothing to save: no candidate has a valid price and quantity".to_string());
    }

    let store = store.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let notes = notes.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let tx = conn
        .transaction()
        .map_err(|e| format!("Failed to start transaction: {}", e))?;

    let (product, created_product) = match target {
        SaveTarget::Existing { product_id } => {
            let product = Product::get_by_id(&tx, product_id)
                .map_err(|e| format!("Database error: {}", e))?
                .ok_or_else(|| format!("Product not found with id: {}", product_id))?;
            (product, false)
        }
        SaveTarget::New { name, category_id } => {
            let name = name.trim();
            if name.is_empty() {
                return Err("Product name cannot be empty".to_string());
            }
            if Category::get_by_id(&tx, category_id)
                .map_err(|e| format!("Database error: {}", e))?
                .is_none()
            {
                return Err(format!("Category not found with id: {}", category_id));
            }
            let product = Product::create(
                &tx,
                &ProductCreate {
                    name: name.to_string(),
                    category_id,
                    unit_measure: session.unit(),
                },
            )
            .map_err(|e| format!("Failed to create product: {}", e))?;
            (product, true)
        }
    };

    let mut saved = Vec::with_capacity(to_save.len());
    for (candidate, price, quantity) in to_save {
        let quantity = convert_quantity(quantity, session.unit(), product.unit_measure).ok_or_else(|| {
            format!(
                "Cannot save quantities in '{}' to product '{}' measured in '{}'",
                session.unit(),
                product.name,
                product.unit_measure
            )
        })?;
        let presentation = ProductPresentation::create(
            &tx,
            &PresentationCreate {
                product_id: product.id,
                price,
                quantity,
                store: store.clone(),
                date: None,
                notes: notes.clone().or_else(|| Some(candidate.name.clone())),
            },
        )
        .map_err(|e| format!("Failed to save candidate {}: {}", candidate.id, e))?;

        saved.push(SavedPresentation {
            candidate_id: candidate.id,
            presentation_id: presentation.id,
            price,
            quantity,
        });
    }

    tx.commit()
        .map_err(|e| format!("Failed to commit comparison: {}", e))?;

    tracing::info!(
        product_id = product.id,
        saved = saved.len(),
        skipped = skipped_candidates.len(),
        "Saved comparison"
    );

    Ok(SaveComparisonResponse {
        success: true,
        product_id: product.id,
        product_name: product.name,
        created_product,
        unit_measure: product.unit_measure,
        saved,
        skipped_candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::catalog;

    fn filled_session() -> Comparison {
        let mut session = Comparison::new();
        update_candidate(&mut session, 1, "price", "10,00").unwrap();
        update_candidate(&mut session, 1, "quantity", "2").unwrap();
        let added = add_candidate(&mut session).unwrap();
        update_candidate(&mut session, added.id, "price", "9,00").unwrap();
        update_candidate(&mut session, added.id, "quantity", "3").unwrap();
        session
    }

    fn count_presentations(db: &Database) -> i64 {
        db.with_conn(ProductPresentation::count).unwrap()
    }

    #[test]
    fn test_update_rejects_unknown_field_and_id() {
        let mut session = Comparison::new();
        assert!(update_candidate(&mut session, 1, "unitValue", "3").is_err());
        assert!(update_candidate(&mut session, 5, "price", "3")
            .unwrap_err()
            .contains("not found"));
    }

    #[test]
    fn test_session_tools_flow() {
        let mut session = filled_session();
        let snapshot = get_comparison(&session);
        assert_eq!(snapshot.best_value_id, Some(2));

        let snapshot = set_comparison_unit(&mut session, "L").unwrap();
        assert_eq!(snapshot.candidates[1].unit_value_display, "R$ 3,00/L");
        let err = set_comparison_unit(&mut session, "furlong").unwrap_err();
        assert!(err.contains("ml, L, g, kg, un"));
        assert!(err.contains("also accepted: m, cm"));
        assert_eq!(set_comparison_unit(&mut session, "cm").unwrap().unit, UnitMeasure::Cm);
        set_comparison_unit(&mut session, "L").unwrap();

        let snapshot = reset_comparison(&mut session);
        assert_eq!(snapshot.candidates.len(), 1);
        assert_eq!(snapshot.best_value_id, None);
    }

    #[test]
    fn test_save_creates_product_and_appends() {
        let db = Database::in_memory().unwrap();
        let mut session = filled_session();
        add_candidate(&mut session).unwrap(); // blank, skipped

        let target = SaveTarget::New {
            name: "Sabonete".to_string(),
            category_id: 4,
        };
        let response =
            save_comparison(&db, &session, target, Some("Mercado".to_string()), None).unwrap();

        assert!(response.created_product);
        assert_eq!(response.unit_measure, UnitMeasure::Ml);
        assert_eq!(response.saved.len(), 2);
        assert_eq!(response.skipped_candidates, vec![3]);

        let listed = catalog::list_product_presentations(&db, response.product_id).unwrap();
        assert_eq!(listed.presentations.len(), 2);
        assert!(listed.presentations.iter().all(|p| p.store.as_deref() == Some("Mercado")));
        assert!(listed
            .presentations
            .iter()
            .any(|p| p.notes.as_deref() == Some("Produto 2")));

        // Saving again appends instead of overwriting
        let again = save_comparison(
            &db,
            &session,
            SaveTarget::Existing {
                product_id: response.product_id,
            },
            None,
            None,
        )
        .unwrap();
        assert!(!again.created_product);
        assert_eq!(count_presentations(&db), 4);
    }

    #[test]
    fn test_save_converts_units() {
        let db = Database::in_memory().unwrap();
        let product = catalog::add_product(&db, "Leite", 2, "ml").unwrap();

        let mut session = filled_session();
        set_comparison_unit(&mut session, "L").unwrap();

        let response = save_comparison(
            &db,
            &session,
            SaveTarget::Existing {
                product_id: product.id,
            },
            None,
            None,
        )
        .unwrap();

        let quantities: Vec<f64> = response.saved.iter().map(|s| s.quantity).collect();
        assert_eq!(quantities, vec![2000.0, 3000.0]);
    }

    #[test]
    fn test_save_rejects_incompatible_units_atomically() {
        let db = Database::in_memory().unwrap();
        let product = catalog::add_product(&db, "Arroz", 1, "kg").unwrap();

        let session = filled_session(); // ml
        let err = save_comparison(
            &db,
            &session,
            SaveTarget::Existing {
                product_id: product.id,
            },
            None,
            None,
        )
        .unwrap_err();
        assert!(err.contains("Cannot save"));
        assert_eq!(count_presentations(&db), 0);
    }

    #[test]
    fn test_save_nothing_valid() {
        let db = Database::in_memory().unwrap();
        let mut session = Comparison::new();
        update_candidate(&mut session, 1, "price", "abc").unwrap();

        let err = save_comparison(
            &db,
            &session,
            SaveTarget::New {
                name: "Nada".to_string(),
                category_id: 5,
            },
            None,
            None,
        )
        .unwrap_err();
        assert!(err.starts_with("Nothing to save"));
        assert_eq!(catalog::list_products(&db, None).unwrap().total, 0);
    }

    #[test]
    fn test_save_skips_non_positive_amounts() {
        assert_eq!(storable_amounts("10", "2"), Some((10.0, 2.0)));
        assert_eq!(storable_amounts("0", "2"), None);
        assert_eq!(storable_amounts("10", "-2"), None);
        assert_eq!(storable_amounts("", "2"), None);
    }

    #[test]
    fn test_save_to_missing_targets() {
        let db = Database::in_memory().unwrap();
        let session = filled_session();

        let err = save_comparison(&db, &session, SaveTarget::Existing { product_id: 9 }, None, None)
            .unwrap_err();
        assert!(err.contains("Product not found"));

        let err = save_comparison(
            &db,
            &session,
            SaveTarget::New {
                name: "X".to_string(),
                category_id: 42,
            },
            None,
            None,
        )
        .unwrap_err();
        assert!(err.contains("Category not found"));
    }
}
