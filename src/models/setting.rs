//! Settings model
//!
//! Single key/value table for app preferences.

use rusqlite::{params, Connection};

use crate::db::DbResult;

/// Key under which the light/dark choice is stored
pub const THEME_PREFERENCE_KEY: &str = "theme_preference";

pub struct Setting;

impl Setting {
    pub fn get(conn: &Connection, key: &str) -> DbResult<Option<String>> {
        let result = conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or replace a value (upsert)
    pub fn set(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO settings (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_get_missing_key() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(Setting::get(&conn, THEME_PREFERENCE_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        Setting::set(&conn, THEME_PREFERENCE_KEY, "dark").unwrap();
        Setting::set(&conn, THEME_PREFERENCE_KEY, "light").unwrap();
        assert_eq!(
            Setting::get(&conn, THEME_PREFERENCE_KEY).unwrap().as_deref(),
            Some("light")
        );
    }
}
