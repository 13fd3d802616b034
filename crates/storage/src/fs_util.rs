//! Atomic snapshot writes: temp file in the same directory, then rename.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| StorageError::io(parent, e))?;
    }
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, bytes).await.map_err(|e| StorageError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| StorageError::io(path, e))
}

/// Reads a JSON snapshot. A missing file yields `None`.
pub(crate) fn read_snapshot<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, StorageError> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(None),
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StorageError::corrupt(format!("snapshot {}", path.display()), e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StorageError::io(path, e)),
    }
}
