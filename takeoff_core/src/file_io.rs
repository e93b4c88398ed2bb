//! # File I/O Module
//!
//! Worksheet files with two safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Refuse files written by a newer schema
//!
//! ## File Format
//!
//! Worksheets are pretty-printed JSON, conventionally `*.takeoff.json`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::file_io::{load_worksheet, save_worksheet};
//! use takeoff_core::worksheet::Worksheet;
//! use std::path::Path;
//!
//! let sheet = Worksheet::new("Casa Silva", "João Silva");
//! let path = Path::new("casa-silva.takeoff.json");
//!
//! save_worksheet(&sheet, path).unwrap();
//! let loaded = load_worksheet(path).unwrap();
//! assert_eq!(loaded.meta.id, sheet.meta.id);
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::errors::{CalcError, CalcResult};
use crate::worksheet::{Worksheet, SCHEMA_VERSION};

/// Save a worksheet with atomic write semantics.
///
/// The save process:
/// 1. Serialize worksheet to JSON
/// 2. Write to a temporary file next to the target
/// 3. Sync to disk (fsync)
/// 4. Rename the temporary file over the target
pub fn save_worksheet(sheet: &Worksheet, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(sheet)?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!("saved worksheet '{}' to {}", sheet.meta.name, path.display());
    Ok(())
}

/// Load a worksheet from a file.
///
/// # Returns
///
/// * `Ok(Worksheet)` - Successfully loaded worksheet
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_worksheet(path: &Path) -> CalcResult<Worksheet> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let sheet: Worksheet = serde_json::from_str(&contents).map_err(|e| {
        CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e))
    })?;

    validate_version(&sheet.meta.version)?;

    debug!(
        "loaded worksheet '{}' (schema {}) from {}",
        sheet.meta.name,
        sheet.meta.version,
        path.display()
    );
    Ok(sheet)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Validate that a file version is compatible with the current schema.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let parse = |v: &str| -> Option<Vec<u32>> {
        v.split('.').map(|p| p.trim().parse().ok()).collect()
    };
    let file_parts = parse(file_version).filter(|p| !p.is_empty()).ok_or_else(mismatch)?;
    let current_parts = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor may carry breaking changes
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn temp_worksheet_path(name: &str) -> PathBuf {
        temp_dir().join(format!("takeoff_test_{}_{}.takeoff.json", name, std::process::id()))
    }

    #[test]
    fn test_tmp_path() {
        let tmp = tmp_path_for(Path::new("/jobs/casa.takeoff.json"));
        assert_eq!(tmp, Path::new("/jobs/casa.takeoff.json.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_worksheet_path("roundtrip");

        let mut sheet = Worksheet::new("Casa Silva", "João Silva");
        sheet.footings = sheet.footings.with_field(0, "count", "4").unwrap();
        save_worksheet(&sheet, &path).unwrap();

        let loaded = load_worksheet(&path).unwrap();
        assert_eq!(loaded.meta.name, "Casa Silva");
        assert_eq!(loaded.meta.client, "João Silva");
        assert_eq!(loaded.footings.rows()[0].count, "4");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_worksheet_path("atomic");
        let tmp_path = tmp_path_for(&path);

        save_worksheet(&Worksheet::new("A", "B"), &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_worksheet(Path::new("/nonexistent/dir/none.takeoff.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_json() {
        let path = temp_worksheet_path("invalid");
        fs::write(&path, "{ not json").unwrap();
        let err = load_worksheet(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_newer_schema_rejected() {
        let path = temp_worksheet_path("newer");
        let mut sheet = Worksheet::new("A", "B");
        sheet.meta.version = "0.9.0".to_string();
        save_worksheet(&sheet, &path).unwrap();

        let err = load_worksheet(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.3").is_ok());

        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("").is_err());
        assert!(validate_version("zero.one").is_err());
    }
}
