//! Runtime configuration
//!
//! Everything is read from the environment; there is no config file.

use std::path::PathBuf;

/// Overrides the SQLite database location
pub const DATABASE_PATH_ENV: &str = "COMPARAPRECO_DATABASE_PATH";

/// Default log directive when RUST_LOG does not mention the crate
pub const DEFAULT_LOG_DIRECTIVE: &str = "comparapreco=info";

const DATABASE_FILE_NAME: &str = "comparapreco.db";

/// Get the database path from environment or use default
///
/// The default is `data/comparapreco.db` under the project root, found by
/// walking up from `target/release` or `target/debug`.
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path)
}

fn default_database_path() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    let mut path = project_root(exe_dir);
    path.push("data");
    path.push(DATABASE_FILE_NAME);
    path
}

/// Go up from target/release or target/debug to project root
fn project_root(exe_dir: PathBuf) -> PathBuf {
    if exe_dir.ends_with("release") || exe_dir.ends_with("debug") {
        if let Some(grandparent) = exe_dir.parent().and_then(|p| p.parent()) {
            return grandparent.to_path_buf();
        }
    }
    exe_dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_root_from_target_dir() {
        let root = project_root(PathBuf::from("/work/comparapreco/target/release"));
        assert_eq!(root, PathBuf::from("/work/comparapreco"));

        let root = project_root(PathBuf::from("/work/comparapreco/target/debug"));
        assert_eq!(root, PathBuf::from("/work/comparapreco"));
    }

    #[test]
    fn test_project_root_elsewhere() {
        let root = project_root(PathBuf::from("/usr/local/bin"));
        assert_eq!(root, PathBuf::from("/usr/local/bin"));
    }

    #[test]
    fn test_default_path_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/comparapreco.db"));
    }
}
