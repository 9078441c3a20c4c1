//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Everything lives under `~/.ghostline/`.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Ghostline directory (~/.ghostline/)
pub fn ghostline_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".ghostline"))
}

/// Get the config file path (~/.ghostline/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(ghostline_dir()?.join("config.json"))
}

/// Get the default workspace memory path (~/.ghostline/workspace_memory.json)
pub fn memory_path() -> AppResult<PathBuf> {
    Ok(ghostline_dir()?.join("workspace_memory.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the Ghostline directory, creating if it doesn't exist
pub fn ensure_ghostline_dir() -> AppResult<PathBuf> {
    let path = ghostline_dir()?;
    ensure_dir(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghostline_dir() {
        let path = ghostline_dir().unwrap();
        assert!(path.to_string_lossy().contains(".ghostline"));
    }

    #[test]
    fn test_config_path() {
        let path = config_path().unwrap();
        assert!(path.ends_with(".ghostline/config.json"));
    }

    #[test]
    fn test_memory_path() {
        let path = memory_path().unwrap();
        assert!(path.to_string_lossy().contains("workspace_memory.json"));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
