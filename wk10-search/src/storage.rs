//! Upload storage
//!
//! Accepted uploads are written to a single flat directory. Names are
//! sanitized so the written path can never leave that directory. There is
//! no uniqueness suffix: two uploads with the same name overwrite each other,
//! and nothing ever deletes stored files.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SearchResult;

/// Name used when sanitization leaves nothing behind
const FALLBACK_FILE_NAME: &str = "upload";

/// Longest name most filesystems accept for one path component, in bytes
pub const MAX_FILENAME_LENGTH: usize = 255;

/// A file received from the upload form
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Client-supplied file name (untrusted)
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A file written by [`LocalStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Full path of the written file
    pub path: PathBuf,
    /// Sanitized file name inside the upload folder
    pub file_name: String,
}

/// Flat-directory upload sink
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Write the upload to `base_dir/<sanitized name>`
    pub async fn store(&self, upload: &UploadRequest) -> SearchResult<StoredAsset> {
        let file_name = sanitize_filename(&upload.file_name);
        let path = self.base_dir.join(&file_name);

        tokio::fs::write(&path, &upload.bytes).await?;

        debug!(
            path = %path.display(),
            bytes = upload.bytes.len(),
            "Stored upload"
        );

        Ok(StoredAsset { path, file_name })
    }
}

/// Reduce a client-supplied name to a safe single path component
///
/// Separators become spaces, whitespace runs become `_`, anything outside
/// ASCII alphanumerics and `_ . -` is dropped, and leading/trailing `.`/`_`
/// are trimmed. The result is never empty, never `.` or `..`, and at most
/// [`MAX_FILENAME_LENGTH`] bytes; long names lose the end of their stem and
/// keep their extension.
pub fn sanitize_filename(file_name: &str) -> String {
    let without_separators: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = without_separators
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        truncate_file_name(trimmed)
    }
}

/// Shorten an already-sanitized (ASCII) name to [`MAX_FILENAME_LENGTH`] bytes
fn truncate_file_name(name: &str) -> String {
    if name.len() <= MAX_FILENAME_LENGTH {
        return name.to_string();
    }

    match name.rsplit_once('.') {
        Some((stem, extension)) if extension.len() + 2 <= MAX_FILENAME_LENGTH => {
            let stem = &stem[..MAX_FILENAME_LENGTH - extension.len() - 1];
            let stem = stem.trim_end_matches(|c| c == '.' || c == '_');
            if stem.is_empty() {
                format!("{}.{}", FALLBACK_FILE_NAME, extension)
            } else {
                format!("{}.{}", stem, extension)
            }
        }
        _ => name[..MAX_FILENAME_LENGTH]
            .trim_end_matches(|c| c == '.' || c == '_')
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("cat.png"), "cat.png");
        assert_eq!(sanitize_filename("my-file_1.JPG"), "my-file_1.JPG");
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "etc_passwd.png");
        assert_eq!(sanitize_filename("..\\..\\windows\\win.ini.bmp"), "windows_win.ini.bmp");
        assert_eq!(sanitize_filename("/abs/path/x.gif"), "abs_path_x.gif");
    }

    #[test]
    fn test_sanitize_whitespace_and_symbols() {
        assert_eq!(sanitize_filename("my cat  photo.jpg"), "my_cat_photo.jpg");
        assert_eq!(sanitize_filename("caf\u{e9} <b>.png"), "caf_b.png");
    }

    #[test]
    fn test_sanitize_caps_length_and_keeps_extension() {
        let long = format!("{}.png", "a".repeat(300));
        let clean = sanitize_filename(&long);
        assert_eq!(clean.len(), MAX_FILENAME_LENGTH);
        assert!(clean.ends_with(".png"));
        assert!(crate::validators::is_allowed(&clean));

        let no_extension = "b".repeat(400);
        assert_eq!(sanitize_filename(&no_extension).len(), MAX_FILENAME_LENGTH);

        assert_eq!(sanitize_filename("short.png"), "short.png");
    }

    #[tokio::test]
    async fn test_store_accepts_overlong_name() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let upload = UploadRequest {
            file_name: format!("{}.png", "a".repeat(300)),
            bytes: vec![7, 7, 7],
        };

        let asset = storage.store(&upload).await.unwrap();
        assert_eq!(asset.path.parent(), Some(dir.path()));
        assert!(asset.file_name.ends_with(".png"));
        assert_eq!(std::fs::read(&asset.path).unwrap(), vec![7, 7, 7]);
    }

    #[test]
    fn test_sanitize_never_empty_or_dots() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
        assert_eq!(sanitize_filename("../"), "upload");
        assert_eq!(sanitize_filename("\u{1f600}"), "upload");
        assert_eq!(sanitize_filename("..png"), "png");
    }

    #[test]
    fn test_sanitized_names_have_no_separators() {
        let hostile = [
            "../../../../tmp/evil.png",
            "..\\..\\evil.png",
            "a/b/c/../../d.jpg",
            "./.././x.bmp",
            "....//....//y.gif",
        ];
        for name in hostile {
            let clean = sanitize_filename(name);
            assert!(!clean.contains('/'), "{} -> {}", name, clean);
            assert!(!clean.contains('\\'), "{} -> {}", name, clean);
            assert!(!clean.starts_with('.'), "{} -> {}", name, clean);
        }
    }

    #[tokio::test]
    async fn test_store_writes_inside_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let upload = UploadRequest {
            file_name: "../../outside.png".to_string(),
            bytes: vec![1, 2, 3],
        };
        let asset = storage.store(&upload).await.unwrap();

        assert_eq!(asset.file_name, "outside.png");
        assert_eq!(asset.path.parent(), Some(dir.path()));
        assert_eq!(std::fs::read(&asset.path).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_store_same_name_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        let first = UploadRequest {
            file_name: "dup.png".to_string(),
            bytes: vec![1],
        };
        let second = UploadRequest {
            file_name: "dup.png".to_string(),
            bytes: vec![2, 2],
        };

        let a = storage.store(&first).await.unwrap();
        let b = storage.store(&second).await.unwrap();
        assert_eq!(a.path, b.path);
        assert_eq!(std::fs::read(&b.path).unwrap(), vec![2, 2]);
    }

    #[tokio::test]
    async fn test_store_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("does-not-exist"));

        let upload = UploadRequest {
            file_name: "x.png".to_string(),
            bytes: vec![0],
        };
        let err = storage.store(&upload).await.unwrap_err();
        assert!(matches!(err, crate::SearchError::Io(_)));
    }
}
