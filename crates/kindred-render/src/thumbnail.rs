//! Thumbnail loading and embedding.
//!
//! Rendering never fails because of an image: loaders report a [`ThumbnailError`], the renderer
//! logs it and leaves the image slot empty.

use base64::Engine as _;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("failed to read thumbnail {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported thumbnail location: {location}")]
    UnsupportedLocation { location: String },
    #[error("unknown thumbnail image format: {location}")]
    UnknownFormat { location: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Thumbnail {
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

pub trait ThumbnailLoader {
    /// Resolves `location` into an `href` usable by an SVG `<image>`.
    fn load(&self, location: &str) -> Result<String, ThumbnailError>;
}

/// Drops every thumbnail.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThumbnails;

impl ThumbnailLoader for NoThumbnails {
    fn load(&self, location: &str) -> Result<String, ThumbnailError> {
        Err(ThumbnailError::UnsupportedLocation {
            location: location.to_string(),
        })
    }
}

/// Passes remote and `data:` URLs through and embeds local files as data URIs.
///
/// Relative paths are resolved against `base_dir` (the current directory when unset).
#[derive(Debug, Clone, Default)]
pub struct FileThumbnailLoader {
    pub base_dir: Option<PathBuf>,
    /// Keep `http(s)` URLs as links instead of rejecting them.
    pub allow_remote: bool,
}

impl FileThumbnailLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            allow_remote: false,
        }
    }

    fn resolve(&self, location: &str) -> Result<PathBuf, ThumbnailError> {
        let unsupported = || ThumbnailError::UnsupportedLocation {
            location: location.to_string(),
        };
        match url::Url::parse(location) {
            Ok(u) if u.scheme() == "file" => u.to_file_path().map_err(|_| unsupported()),
            // Windows drive letters parse as a one-letter scheme.
            Ok(u) if u.scheme().len() == 1 => Ok(PathBuf::from(location)),
            Ok(_) => Err(unsupported()),
            Err(_) => {
                let path = Path::new(location);
                Ok(match &self.base_dir {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path.to_path_buf(),
                })
            }
        }
    }

    pub fn read(&self, location: &str) -> Result<Thumbnail, ThumbnailError> {
        let path = self.resolve(location)?;
        let mime = mime_for(&path).ok_or_else(|| ThumbnailError::UnknownFormat {
            location: location.to_string(),
        })?;
        let bytes = std::fs::read(&path).map_err(|source| ThumbnailError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Thumbnail { mime, bytes })
    }
}

impl ThumbnailLoader for FileThumbnailLoader {
    fn load(&self, location: &str) -> Result<String, ThumbnailError> {
        let location = location.trim();
        if location.starts_with("data:image/") {
            return Ok(location.to_string());
        }
        if self.allow_remote && (location.starts_with("http://") || location.starts_with("https://"))
        {
            return Ok(location.to_string());
        }
        self.read(location).map(|t| t.to_data_uri())
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_encoding() {
        let t = Thumbnail {
            mime: "image/png",
            bytes: b"abc".to_vec(),
        };
        assert_eq!(t.to_data_uri(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn local_files_are_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("p.png"), b"abc").unwrap();
        let loader = FileThumbnailLoader::new(dir.path());
        assert_eq!(loader.load("p.png").unwrap(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn failures_are_typed() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FileThumbnailLoader::new(dir.path());
        assert!(matches!(
            loader.load("missing.jpg"),
            Err(ThumbnailError::Io { .. })
        ));
        assert!(matches!(
            loader.load("notes.txt"),
            Err(ThumbnailError::UnknownFormat { .. })
        ));
        assert!(matches!(
            loader.load("https://example.org/a.png"),
            Err(ThumbnailError::UnsupportedLocation { .. })
        ));
        assert!(NoThumbnails.load("a.png").is_err());
    }
}
