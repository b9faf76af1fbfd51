use std::env;
use std::path::PathBuf;

/// Get the path to the Planforge data directory (~/.planforge)
pub fn planforge_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".planforge")
    } else {
        dirs::home_dir()
            .unwrap_or_else(env::temp_dir)
            .join(".planforge")
    }
}

/// Get the path to the default SQLite database (~/.planforge/planforge.db)
pub fn database_file() -> PathBuf {
    planforge_dir().join("planforge.db")
}
