//! JSON document helpers shared by the file backends.

use crate::errors::{AppError, AppResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Read a JSON array from `path`. A missing or blank file yields `None`.
pub fn read_array<T: DeserializeOwned>(path: &Path) -> AppResult<Option<Vec<T>>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&content)?))
}

/// Serialize with object keys sorted and a 4-space indent.
pub fn to_sorted_pretty<T: Serialize>(value: &T) -> AppResult<Vec<u8>> {
    // serde_json's Map is ordered by key, so a round-trip through Value sorts
    // every nested object.
    let value: Value = serde_json::to_value(value)?;

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn temp_sibling(path: &Path) -> AppResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| AppError::Other(format!("not a file path: {}", path.display())))?;
    let mut tmp = std::ffi::OsString::from(".");
    tmp.push(name);
    tmp.push(".tmp");
    Ok(path.with_file_name(tmp))
}

/// Replace `path` with the serialized `value`: write a sibling temp file,
/// flush it, then rename it over the target.
pub fn write_atomic<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let bytes = to_sorted_pretty(value)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_sibling(path)?;
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_and_indented() {
        let bytes = to_sorted_pretty(&json!([{"b": 1, "a": {"z": 0, "y": 1}}])).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "[\n    {\n        \"a\": {\n            \"y\": 1,\n            \"z\": 0\n        },\n        \"b\": 1\n    }\n]"
        );
    }

    #[test]
    fn missing_and_blank_files_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        assert!(read_array::<Value>(&path).unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(read_array::<Value>(&path).unwrap().is_none());
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("x.json");

        write_atomic(&path, &json!([1, 2])).unwrap();

        assert_eq!(read_array::<i64>(&path).unwrap(), Some(vec![1, 2]));
        assert!(!dir.path().join("nested").join(".x.json.tmp").exists());
    }
}
