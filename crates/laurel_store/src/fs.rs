//! Shared JSON file helpers for the stores.

use laurel_error::{LaurelResult, StoreError, StoreErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Prepare a store path: create the parent directory and initialize the file
/// to an empty JSON object when absent.
pub(crate) fn prepare(path: impl Into<PathBuf>) -> LaurelResult<PathBuf> {
    let path = path.into();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            StoreError::new(StoreErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    if !path.exists() {
        std::fs::write(&path, b"{}").map_err(|e| {
            StoreError::new(StoreErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        tracing::info!(path = %path.display(), "Initialized empty store file");
    }

    Ok(path)
}

/// Read a JSON store file, treating a missing or unparseable file as empty.
///
/// Parse failures are logged and never propagated; the next successful save
/// replaces the damaged file.
pub(crate) async fn read_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return T::default(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to read store file, treating as empty"
            );
            return T::default();
        }
    };

    match serde_json::from_slice(&data) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Store file is not valid JSON, treating as empty"
            );
            T::default()
        }
    }
}

/// Write a JSON store file via a temp file and rename for atomicity.
pub(crate) async fn write_atomic<T>(path: &Path, value: &T) -> LaurelResult<()>
where
    T: Serialize,
{
    let data = serde_json::to_vec_pretty(value)
        .map_err(|e| StoreError::new(StoreErrorKind::Serialize(e.to_string())))?;

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, &data).await.map_err(|e| {
        StoreError::new(StoreErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StoreError::new(StoreErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })?;

    Ok(())
}
