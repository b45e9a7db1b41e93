//! Path utilities: expand ~ and validate file-name components.

use crate::errors::{AppError, AppResult};
use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Make sure `name` can be used as a single file name inside a data directory.
pub fn ensure_file_component(name: &str) -> AppResult<()> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(AppError::InvalidKey(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_escapes() {
        assert!(ensure_file_component("meter_01").is_ok());
        assert!(ensure_file_component("../etc").is_err());
        assert!(ensure_file_component("a/b").is_err());
        assert!(ensure_file_component("a\\b").is_err());
        assert!(ensure_file_component("").is_err());
        assert!(ensure_file_component("..").is_err());
    }

    #[test]
    fn dots_inside_a_name_are_fine() {
        assert!(ensure_file_component("v1..2_h1").is_ok());
        assert!(ensure_file_component("..h").is_ok());
    }
}
