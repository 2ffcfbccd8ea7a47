//! Upload collaborator
//!
//! Checks a local file before its slot is marked present. The bytes are
//! never read; only the name, extension and size matter.

use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

/// 2 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File not found: {0}")]
    Missing(String),
    #[error("Not a file: {0}")]
    NotAFile(String),
    #[error("Unsupported file type (allowed: {allowed})")]
    UnsupportedType { allowed: String },
    #[error("File is larger than {limit_kib} KB")]
    TooLarge { limit_kib: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub accepted_extensions: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_extensions: DEFAULT_ACCEPTED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn new(accepted_extensions: Vec<String>, max_bytes: u64) -> Self {
        Self {
            accepted_extensions: accepted_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_bytes,
        }
    }

    /// Label for the slot picker, e.g. "PDF/JPG/JPEG/PNG, max 2048 KB"
    pub fn describe(&self) -> String {
        format!(
            "{}, max {} KB",
            self.accepted_extensions
                .iter()
                .map(|e| e.to_ascii_uppercase())
                .collect::<Vec<_>>()
                .join("/"),
            self.max_bytes / 1024
        )
    }

    /// Validate the file at `path` and return the name to show in its slot
    pub fn inspect(&self, path: &Path) -> Result<String, UploadError> {
        let shown = path.display().to_string();
        let metadata = fs::metadata(path).map_err(|_| UploadError::Missing(shown.clone()))?;
        if !metadata.is_file() {
            return Err(UploadError::NotAFile(shown));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !self.accepted_extensions.iter().any(|e| *e == extension) {
            return Err(UploadError::UnsupportedType {
                allowed: self.accepted_extensions.join(", "),
            });
        }

        if metadata.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit_kib: self.max_bytes / 1024,
            });
        }

        Ok(path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(shown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn file_with(dir: &tempfile::TempDir, name: &str, bytes: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&vec![0u8; bytes]).unwrap();
        path
    }

    #[test]
    fn test_accepts_small_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(&dir, "pan.pdf", 1024);
        assert_eq!(UploadPolicy::default().inspect(&path), Ok("pan.pdf".to_string()));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(&dir, "scan.JPG", 10);
        assert!(UploadPolicy::default().inspect(&path).is_ok());
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(&dir, "notes.docx", 10);
        assert!(matches!(
            UploadPolicy::default().inspect(&path),
            Err(UploadError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let policy = UploadPolicy::new(vec![".PDF".to_string()], 100);
        let path = file_with(&dir, "big.pdf", 101);
        assert_eq!(
            policy.inspect(&path),
            Err(UploadError::TooLarge { limit_kib: 0 })
        );
        let exact = file_with(&dir, "exact.pdf", 100);
        assert!(policy.inspect(&exact).is_ok());
    }

    #[test]
    fn test_rejects_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let policy = UploadPolicy::default();
        assert!(matches!(
            policy.inspect(&dir.path().join("absent.pdf")),
            Err(UploadError::Missing(_))
        ));
        assert!(matches!(
            policy.inspect(dir.path()),
            Err(UploadError::NotAFile(_))
        ));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            UploadPolicy::default().describe(),
            "PDF/JPG/JPEG/PNG, max 2048 KB"
        );
    }
}
