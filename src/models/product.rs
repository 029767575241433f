//! Product model
//!
//! A product groups presentations of the same item, all measured in one unit.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::ProductPresentation;
use crate::db::DbResult;
use crate::units::UnitMeasure;

/// A product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub unit_measure: UnitMeasure,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentations: Option<Vec<ProductPresentation>>,
}

/// Data for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category_id: i64,
    pub unit_measure: UnitMeasure,
}

const SELECT_PRODUCT: &str = r#"
    SELECT p.id, p.name, p.category_id, c.name AS category_name, p.unit_measure, p.created_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

impl Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit: String = row.get("unit_measure")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category_id: row.get("category_id")?,
            category_name: row.get("category_name")?,
            unit_measure: UnitMeasure::from_str(&unit).unwrap_or_default(),
            created_at: row.get("created_at")?,
            presentations: None,
        })
    }

    pub fn create(conn: &Connection, data: &ProductCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO products (name, category_id, unit_measure) VALUES (?1, ?2, ?3)",
            params![data.name, data.category_id, data.unit_measure.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!("{} WHERE p.id = ?1", SELECT_PRODUCT);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List products, optionally restricted to one category
    pub fn list(conn: &Connection, category_id: Option<i64>) -> DbResult<Vec<Self>> {
        let products = match category_id {
            Some(category_id) => {
                let sql = format!(
                    "{} WHERE p.category_id = ?1 ORDER BY p.name COLLATE NOCASE ASC",
                    SELECT_PRODUCT
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([category_id], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!("{} ORDER BY p.name COLLATE NOCASE ASC", SELECT_PRODUCT);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(products)
    }

    /// Product with its presentations attached
    pub fn get_with_presentations(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let Some(mut product) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };
        product.presentations = Some(ProductPresentation::list_for_product(conn, id)?);
        Ok(Some(product))
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::PresentationCreate;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn create(conn: &Connection, name: &str, category_id: i64, unit: UnitMeasure) -> Product {
        Product::create(
            conn,
            &ProductCreate {
                name: name.to_string(),
                category_id,
                unit_measure: unit,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_joins_category_name() {
        let conn = setup();
        let product = create(&conn, "Leite", 2, UnitMeasure::L);
        assert_eq!(product.name, "Leite");
        assert_eq!(product.category_name.as_deref(), Some("Bebidas"));
        assert_eq!(product.unit_measure, UnitMeasure::L);
        assert!(product.presentations.is_none());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let conn = setup();
        let result = Product::create(
            &conn,
            &ProductCreate {
                name: "Nada".to_string(),
                category_id: 99,
                unit_measure: UnitMeasure::G,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_list_filters_by_category() {
        let conn = setup();
        create(&conn, "Sabão", 3, UnitMeasure::G);
        create(&conn, "Arroz", 1, UnitMeasure::Kg);
        create(&conn, "Detergente", 3, UnitMeasure::Ml);

        let all = Product::list(&conn, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Arroz");

        let cleaning: Vec<String> = Product::list(&conn, Some(3))
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(cleaning, vec!["Detergente", "Sabão"]);
        assert_eq!(Product::count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_get_with_presentations() {
        let conn = setup();
        let product = create(&conn, "Café", 1, UnitMeasure::G);
        ProductPresentation::create(
            &conn,
            &PresentationCreate {
                product_id: product.id,
                price: 18.9,
                quantity: 500.0,
                store: Some("Mercado".to_string()),
                date: Some("2025-03-01".to_string()),
                notes: None,
            },
        )
        .unwrap();

        let loaded = Product::get_with_presentations(&conn, product.id).unwrap().unwrap();
        let presentations = loaded.presentations.unwrap();
        assert_eq!(presentations.len(), 1);
        assert_eq!(presentations[0].store.as_deref(), Some("Mercado"));

        assert!(Product::get_with_presentations(&conn, 404).unwrap().is_none());
    }
}
