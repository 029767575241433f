//! Utility to wipe products and presentations from the database
//!
//! Default categories are kept. Pass `--force` to actually delete.

use comparapreco::tools::settings;
use comparapreco::{config, db};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let force = std::env::args().skip(1).any(|arg| arg == "--force");

    let db_path = config::database_path();
    println!("Database path: {}", db_path.display());

    if !db_path.exists() {
        println!("No database found, nothing to clear.");
        return Ok(());
    }

    let database = db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    match settings::clear_data(&database, force)? {
        Ok(done) => {
            println!("Cleared:");
            println!("  Presentations: {}", done.deleted.presentations);
            println!("  Products: {}", done.deleted.products);
            println!("  Categories: {}", done.deleted.categories);
        }
        Err(blocked) => {
            println!("Would delete:");
            println!("  Presentations: {}", blocked.would_delete.presentations);
            println!("  Products: {}", blocked.would_delete.products);
            println!("  Categories: {}", blocked.would_delete.categories);
            println!("Run again with --force to proceed.");
        }
    }

    Ok(())
}
