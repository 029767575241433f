//! Product presentation model
//!
//! One observed package of a product: its price and quantity on a given date.
//! Presentations are append-only price history.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A stored product presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPresentation {
    pub id: i64,
    pub product_id: i64,
    pub price: f64,
    /// Quantity in the product's unit of measure
    pub quantity: f64,
    pub store: Option<String>,
    pub date: String,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for creating a new presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationCreate {
    pub product_id: i64,
    pub price: f64,
    pub quantity: f64,
    pub store: Option<String>,
    /// ISO date, defaults to today (UTC)
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl ProductPresentation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            product_id: row.get("product_id")?,
            price: row.get("price")?,
            quantity: row.get("quantity")?,
            store: row.get("store")?,
            date: row.get("date")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Price per unit of the product's measure
    pub fn unit_value(&self) -> Option<f64> {
        if self.quantity == 0.0 || !self.quantity.is_finite() || !self.price.is_finite() {
            return None;
        }
        Some(self.price / self.quantity)
    }

    pub fn create(conn: &Connection, data: &PresentationCreate) -> DbResult<Self> {
        let date = data
            .date
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

        conn.execute(
            r#"
            INSERT INTO product_presentations (product_id, price, quantity, store, date, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.product_id,
                data.price,
                data.quantity,
                data.store,
                date,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM product_presentations WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Presentations of a product, newest first
    pub fn list_for_product(conn: &Connection, product_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM product_presentations
            WHERE product_id = ?1
            ORDER BY date DESC, id DESC
            "#,
        )?;

        let items = stmt
            .query_map([product_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM product_presentations", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO products (name, category_id, unit_measure) VALUES ('Suco', 2, 'ml')",
            [],
        )
        .unwrap();
        conn
    }

    fn data(price: f64, quantity: f64, date: Option<&str>) -> PresentationCreate {
        PresentationCreate {
            product_id: 1,
            price,
            quantity,
            store: None,
            date: date.map(str::to_string),
            notes: None,
        }
    }

    #[test]
    fn test_create_defaults_date_to_today() {
        let conn = setup();
        let p = ProductPresentation::create(&conn, &data(7.5, 1000.0, None)).unwrap();
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        assert_eq!(p.date, today);
        assert_eq!(p.unit_value(), Some(0.0075));
    }

    #[test]
    fn test_list_is_newest_first() {
        let conn = setup();
        ProductPresentation::create(&conn, &data(5.0, 500.0, Some("2025-01-01"))).unwrap();
        ProductPresentation::create(&conn, &data(9.0, 1000.0, Some("2025-02-01"))).unwrap();
        ProductPresentation::create(&conn, &data(4.0, 500.0, Some("2025-02-01"))).unwrap();

        let ids: Vec<i64> = ProductPresentation::list_for_product(&conn, 1)
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(ProductPresentation::count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_non_positive_values_are_rejected_by_schema() {
        let conn = setup();
        assert!(ProductPresentation::create(&conn, &data(0.0, 1.0, None)).is_err());
        assert!(ProductPresentation::create(&conn, &data(1.0, 0.0, None)).is_err());
    }

    #[test]
    fn test_presentations_cascade_with_product() {
        let conn = setup();
        ProductPresentation::create(&conn, &data(5.0, 500.0, None)).unwrap();
        conn.execute("DELETE FROM products WHERE id = 1", []).unwrap();
        assert_eq!(ProductPresentation::count(&conn).unwrap(), 0);
    }
}
