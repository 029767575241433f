//! Settings MCP Tools
//!
//! Theme preference and data wipe.

use serde::Serialize;

use crate::db::migrations::LAST_DEFAULT_CATEGORY_ID;
use crate::db::{Database, DbResult};
use crate::preferences::{PreferenceContext, ThemeColors, ThemeMode};

/// Response for get_theme / toggle_theme
#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub mode: ThemeMode,
    pub is_dark_mode: bool,
    pub colors: ThemeColors,
}

impl From<ThemeMode> for ThemeResponse {
    fn from(mode: ThemeMode) -> Self {
        Self {
            mode,
            is_dark_mode: mode.is_dark(),
            colors: mode.colors(),
        }
    }
}

/// Row counts removed by clear_data
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ClearedCounts {
    pub presentations: usize,
    pub products: usize,
    pub categories: usize,
}

/// Response for successful clear_data
#[derive(Debug, Serialize)]
pub struct ClearDataSuccessResponse {
    pub success: bool,
    pub deleted: ClearedCounts,
}

/// Response for clear_data called without force
#[derive(Debug, Serialize)]
pub struct ClearDataBlockedResponse {
    pub error: String,
    pub requires_force: bool,
    pub would_delete: ClearedCounts,
}

pub fn get_theme(ctx: &PreferenceContext) -> ThemeResponse {
    ctx.current().into()
}

pub async fn toggle_theme(ctx: &PreferenceContext, db: &Database) -> ThemeResponse {
    ctx.toggle(db).await.into()
}

fn count_user_data(conn: &rusqlite::Connection) -> DbResult<ClearedCounts> {
    let count = |sql: &str| -> DbResult<usize> {
        let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(n as usize)
    };

    Ok(ClearedCounts {
        presentations: count("SELECT COUNT(*) FROM product_presentations")?,
        products: count("SELECT COUNT(*) FROM products")?,
        categories: conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE id > ?1",
            [LAST_DEFAULT_CATEGORY_ID],
            |row| row.get::<_, i64>(0),
        )? as usize,
    })
}

/// Delete all presentations, products and user-created categories
///
/// The seeded default categories are kept. Runs in one transaction.
pub fn clear_user_data(conn: &mut rusqlite::Connection) -> DbResult<ClearedCounts> {
    let tx = conn.transaction()?;

    let presentations = tx.execute("DELETE FROM product_presentations", [])?;
    let products = tx.execute("DELETE FROM products", [])?;
    let categories = tx.execute(
        "DELETE FROM categories WHERE id > ?1",
        [LAST_DEFAULT_CATEGORY_ID],
    )?;

    tx.commit()?;

    Ok(ClearedCounts {
        presentations,
        products,
        categories,
    })
}

/// Wipe user data (requires force=true)
pub fn clear_data(
    db: &Database,
    force: bool,
) -> Result<Result<ClearDataSuccessResponse, ClearDataBlockedResponse>, String> {
    if !force {
        let would_delete = db
            .with_conn(count_user_data)
            .map_err(|e| format!("Failed to count data: {}", e))?;
        return Ok(Err(ClearDataBlockedResponse {
            error: "clear_data deletes all products and presentations and cannot be undone. \
                    Call again with force=true to proceed."
                .to_string(),
            requires_force: true,
            would_delete,
        }));
    }

    let deleted = db
        .with_conn_mut(clear_user_data)
        .map_err(|e| format!("Failed to clear data: {}", e))?;

    tracing::warn!(
        presentations = deleted.presentations,
        products = deleted.products,
        categories = deleted.categories,
        "Cleared all user data"
    );

    Ok(Ok(ClearDataSuccessResponse {
        success: true,
        deleted,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::catalog;

    fn seeded_db() -> Database {
        let db = Database::in_memory().unwrap();
        let pets = catalog::add_category(&db, "Pets").unwrap();
        let food = catalog::add_product(&db, "Ração", pets.id, "kg").unwrap();
        catalog::add_product(&db, "Arroz", 1, "kg").unwrap();
        catalog::add_product_presentation(&db, food.id, 80.0, 10.0, None, None).unwrap();
        catalog::add_product_presentation(&db, food.id, 45.0, 5.0, None, None).unwrap();
        db
    }

    #[test]
    fn test_clear_without_force_is_blocked() {
        let db = seeded_db();
        let blocked = clear_data(&db, false).unwrap().unwrap_err();
        assert!(blocked.requires_force);
        assert_eq!(
            blocked.would_delete,
            ClearedCounts {
                presentations: 2,
                products: 2,
                categories: 1,
            }
        );
        assert_eq!(catalog::list_products(&db, None).unwrap().total, 2);
    }

    #[test]
    fn test_clear_keeps_default_categories() {
        let db = seeded_db();
        let done = clear_data(&db, true).unwrap().unwrap();
        assert!(done.success);
        assert_eq!(done.deleted.presentations, 2);
        assert_eq!(done.deleted.products, 2);
        assert_eq!(done.deleted.categories, 1);

        assert_eq!(catalog::list_products(&db, None).unwrap().total, 0);
        let categories = catalog::list_categories(&db).unwrap();
        assert_eq!(categories.total, 5);
    }

    #[test]
    fn test_theme_response() {
        let ctx = PreferenceContext::new(ThemeMode::Dark);
        let response = get_theme(&ctx);
        assert!(response.is_dark_mode);
        assert_eq!(response.colors, ThemeColors::DARK);
    }

    #[tokio::test]
    async fn test_toggle_theme() {
        let db = Database::in_memory().unwrap();
        let ctx = PreferenceContext::new(ThemeMode::Light);
        let response = toggle_theme(&ctx, &db).await;
        assert_eq!(response.mode, ThemeMode::Dark);
        assert_eq!(get_theme(&ctx).mode, ThemeMode::Dark);
    }
}
