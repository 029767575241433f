//! ComparaPreco
//!
//! An MCP server for comparing unit prices of product presentations.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use comparapreco::mcp::ComparaPrecoService;
use comparapreco::preferences::PreferenceContext;
use comparapreco::{build_info, config, db};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config::DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let db_path = config::database_path();
    eprintln!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            tracing::info!("Database schema out of date, migrating");
        }
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    // Stored theme preference wins over the environment default
    let preferences = PreferenceContext::from_environment();
    match preferences.refresh(&database).await {
        Ok(mode) => tracing::info!(theme = mode.as_str(), "Loaded theme preference"),
        Err(e) => tracing::warn!("Failed to load theme preference: {}", e),
    }

    let service = ComparaPrecoService::new(db_path, database, preferences);

    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
