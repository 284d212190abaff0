//! Asset ingestion: audio file → embedded `data:` payload.
//!
//! The router treats assets as opaque references.  [`FileAssetLoader`] reads
//! a file and encodes it as `data:<mime>;base64,<payload>`, the same shape a
//! browser `FileReader.readAsDataURL` produces, so uploaded assets
//! fingerprint exactly like the platform's own embedded sounds.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine as _;
use thiserror::Error;

use crate::router::ReplacementAsset;

// ---------------------------------------------------------------------------
// IngestError
// ---------------------------------------------------------------------------

/// Errors that can occur while turning a file into an asset.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but contains no bytes.
    #[error("{0} is empty")]
    Empty(PathBuf),
}

// ---------------------------------------------------------------------------
// LoadedAsset
// ---------------------------------------------------------------------------

/// A freshly ingested asset plus the details reported back to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAsset {
    pub file_name: String,
    pub size_bytes: u64,
    pub asset: ReplacementAsset,
}

impl LoadedAsset {
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

// ---------------------------------------------------------------------------
// AssetLoader trait
// ---------------------------------------------------------------------------

/// Async source of replacement assets.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn AssetLoader>`).
#[async_trait]
pub trait AssetLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<LoadedAsset, IngestError>;
}

// ---------------------------------------------------------------------------
// FileAssetLoader
// ---------------------------------------------------------------------------

/// Reads audio files from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileAssetLoader;

#[async_trait]
impl AssetLoader for FileAssetLoader {
    async fn load(&self, path: &Path) -> Result<LoadedAsset, IngestError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| IngestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let uri = format!("data:{};base64,{payload}", mime_for(path));
        let asset = match ReplacementAsset::new(uri) {
            Some(asset) if !bytes.is_empty() => asset,
            _ => return Err(IngestError::Empty(path.to_path_buf())),
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        log::info!("Loaded {file_name} ({} bytes)", bytes.len());

        Ok(LoadedAsset {
            file_name,
            size_bytes: bytes.len() as u64,
            asset,
        })
    }
}

/// Mime type guessed from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("ding.MP3")), "audio/mpeg");
        assert_eq!(mime_for(Path::new("a/b/c.wav")), "audio/wav");
        assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn loads_file_as_data_uri() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("ding.mp3");
        std::fs::write(&path, b"hello").unwrap();

        let loaded = FileAssetLoader.load(&path).await.expect("load");
        assert_eq!(loaded.file_name, "ding.mp3");
        assert_eq!(loaded.size_bytes, 5);
        assert_eq!(loaded.asset.as_str(), "data:audio/mpeg;base64,aGVsbG8=");
        assert!(loaded.asset.is_embedded());
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let dir = tempdir().expect("temp dir");
        let err = FileAssetLoader
            .load(&dir.path().join("missing.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Read { .. }));
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("silence.wav");
        std::fs::write(&path, b"").unwrap();

        let err = FileAssetLoader.load(&path).await.unwrap_err();
        assert!(matches!(err, IngestError::Empty(_)));
    }

    #[test]
    fn loader_is_object_safe() {
        let _: Box<dyn AssetLoader> = Box::new(FileAssetLoader);
    }
}
