//! Runtime configuration
//!
//! Everything is read from the environment; there is no config file.

use std::path::{Path, PathBuf};

/// Environment variable overriding the database location
pub const DATABASE_PATH_ENV: &str = "CALORITRACK_DATABASE_PATH";

/// Default tracing directive when `RUST_LOG` does not mention this crate
pub const DEFAULT_LOG_DIRECTIVE: &str = "caloritrack=info";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));
            default_database_path(&exe_dir)
        })
}

/// `<project>/data/caloritrack.db`, where the project root is the executable's
/// directory with any trailing `target/{debug,release}` removed.
pub fn default_database_path(exe_dir: &Path) -> PathBuf {
    let mut path = exe_dir.to_path_buf();

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("caloritrack.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_strips_target_dir() {
        let path = default_database_path(Path::new("/srv/caloritrack/target/release"));
        assert_eq!(path, PathBuf::from("/srv/caloritrack/data/caloritrack.db"));

        let path = default_database_path(Path::new("/srv/caloritrack/target/debug"));
        assert_eq!(path, PathBuf::from("/srv/caloritrack/data/caloritrack.db"));
    }

    #[test]
    fn test_default_path_installed_binary() {
        let path = default_database_path(Path::new("/usr/local/bin"));
        assert_eq!(path, PathBuf::from("/usr/local/bin/data/caloritrack.db"));
    }
}
