//! Image processing module
//!
//! This module handles:
//! - Loading inputs, including RAW files through their embedded JPEG
//! - Encoding to the supported output formats
//! - The six tool operations (compress, resize, convert, crop, enhance, inflate)
//! - Running CPU-bound work off the UI thread

pub mod codec;
pub mod compress;
pub mod convert;
pub mod crop;
pub mod embedded;
pub mod enhance;
pub mod histogram;
pub mod inflate;
pub mod resize;
pub mod source;

#[cfg(test)]
pub mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ToolError, ToolResult};

/// Run CPU-bound work on tokio's blocking pool
pub async fn run_blocking<T, F>(work: F) -> ToolResult<T>
where
    F: FnOnce() -> ToolResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ToolError::Worker(e.to_string()))?
}

/// Write an encoded result to disk
pub async fn save(path: PathBuf, blob: Arc<Vec<u8>>) -> ToolResult<PathBuf> {
    tokio::fs::write(&path, blob.as_slice()).await?;
    tracing::info!("💾 Saved {} ({} bytes)", path.display(), blob.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_blocking_returns_value() {
        let value = run_blocking(|| Ok(21 * 2)).await;
        assert_eq!(value, Ok(42));
    }

    #[tokio::test]
    async fn test_run_blocking_propagates_error() {
        let value: ToolResult<()> = run_blocking(|| Err(ToolError::EmptyCrop)).await;
        assert_eq!(value, Err(ToolError::EmptyCrop));
    }

    #[tokio::test]
    async fn test_run_blocking_reports_panics() {
        let value: ToolResult<()> = run_blocking(|| panic!("boom")).await;
        assert!(matches!(value, Err(ToolError::Worker(_))));
    }

    #[tokio::test]
    async fn test_save_writes_blob() {
        let name = format!("pixelforge-save-{}.bin", uuid::Uuid::new_v4());
        let path = std::env::temp_dir().join(name);
        let saved = save(path.clone(), Arc::new(vec![1, 2, 3])).await.unwrap();

        assert_eq!(saved, path);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), vec![1, 2, 3]);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
