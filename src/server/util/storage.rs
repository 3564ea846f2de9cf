//! Contract document storage on the local filesystem.
//!
//! Documents are written below the configured upload root and referenced from the
//! database by their path relative to that root, e.g. `contracts/contract-4-2025-03-01-1a2b3c4d.pdf`.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;

use crate::server::error::{
    marketplace::{MarketplaceError, Resource},
    upload::UploadError,
    Error,
};

/// Folder below the upload root holding contract documents.
pub const CONTRACT_FOLDER: &str = "contracts";

/// Extensions accepted for the company's contract upload.
pub const CONTRACT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

/// Extensions accepted for the provider's signed copy.
pub const SIGNED_CONTRACT_EXTENSIONS: &[&str] = &[".pdf"];

/// A file received in a multipart upload, held in memory until stored.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Refuse empty files and extensions outside `allowed`.
    pub fn check(&self, allowed: &'static [&'static str]) -> Result<(), Error> {
        if self.bytes.is_empty() {
            return Err(UploadError::EmptyFile(self.file_name.clone()).into());
        }

        check_extension(&self.file_name, allowed)
    }
}

#[derive(Clone, Debug)]
pub struct DocumentStorage {
    root: PathBuf,
}

impl DocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write a document and return its path relative to the upload root.
    ///
    /// The stored name is `{slug(stem)}-{yyyy-mm-dd}-{8 hex}{ext}` where the
    /// extension is taken from `original_name` and lowercased.
    ///
    /// # Arguments
    /// - `folder` - Folder below the upload root, created when missing
    /// - `stem` - Human readable prefix such as `contract-12`
    /// - `original_name` - Client supplied file name, only its extension is kept
    /// - `bytes` - File contents
    /// - `at` - Timestamp used for the date part of the name
    pub async fn store(
        &self,
        folder: &str,
        stem: &str,
        original_name: &str,
        bytes: &[u8],
        at: NaiveDateTime,
    ) -> Result<String, Error> {
        let extension = extension(original_name).unwrap_or_default();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let file_name = format!(
            "{}-{}-{}{}",
            slugify(stem),
            at.format("%Y-%m-%d"),
            &suffix[..8],
            extension
        );

        let directory = self.root.join(folder);
        tokio::fs::create_dir_all(&directory).await?;
        tokio::fs::write(directory.join(&file_name), bytes).await?;

        tracing::debug!(folder = %folder, file_name = %file_name, "Stored document");

        Ok(format!("{}/{}", folder, file_name))
    }

    /// Read a stored document by its relative path.
    ///
    /// Paths that escape the upload root and missing files are reported as a
    /// missing document.
    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, Error> {
        let path = self.resolve(relative)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MarketplaceError::not_found(Resource::Document, 0).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored document, ignoring files that no longer exist.
    pub async fn remove(&self, relative: &str) -> Result<(), Error> {
        let path = self.resolve(relative)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, Error> {
        let relative_path = Path::new(relative);
        let is_contained = relative_path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        if !is_contained {
            return Err(MarketplaceError::not_found(Resource::Document, 0).into());
        }

        Ok(self.root.join(relative_path))
    }
}

/// Lowercased extension of a file name including the dot.
pub fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}

/// Ensure the file name ends with one of the allowed extensions.
pub fn check_extension(file_name: &str, allowed: &'static [&'static str]) -> Result<(), Error> {
    match extension(file_name) {
        Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
        _ => Err(UploadError::UnsupportedExtension {
            file_name: file_name.to_string(),
            allowed,
        }
        .into()),
    }
}

/// Reduce a name to lowercase ASCII letters, digits and single dashes.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());

    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_matches('-').to_string()
}

/// MIME type served for a stored document.
pub fn content_type(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some(".pdf") => "application/pdf",
        Some(".doc") => "application/msword",
        Some(".docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

/// Final path segment of a stored document.
pub fn file_name(relative: &str) -> &str {
    relative.rsplit('/').next().unwrap_or(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("  Contract  12 -- Signed! "), "contract-12-signed");
        assert_eq!(slugify("contract-4"), "contract-4");
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension("Deal.PDF").as_deref(), Some(".pdf"));
        assert_eq!(extension("no-extension"), None);
    }

    #[test]
    fn uploaded_file_must_not_be_empty() {
        let empty = UploadedFile {
            file_name: "contract.pdf".to_string(),
            bytes: Vec::new(),
        };
        let filled = UploadedFile {
            file_name: "contract.pdf".to_string(),
            bytes: b"%PDF-1.4".to_vec(),
        };

        assert!(empty.check(CONTRACT_EXTENSIONS).is_err());
        assert!(filled.check(SIGNED_CONTRACT_EXTENSIONS).is_ok());
    }

    #[test]
    fn check_extension_rejects_other_types() {
        assert!(check_extension("contract.docx", CONTRACT_EXTENSIONS).is_ok());
        assert!(check_extension("contract.docx", SIGNED_CONTRACT_EXTENSIONS).is_err());
        assert!(check_extension("contract.exe", CONTRACT_EXTENSIONS).is_err());
    }

    mod documents {
        use chrono::NaiveDate;

        use crate::server::util::storage::DocumentStorage;

        /// Expect a stored document to be readable and removable by its relative path
        #[tokio::test]
        async fn stores_reads_and_removes() {
            let dir = tempfile::tempdir().unwrap();
            let storage = DocumentStorage::new(dir.path());
            let at = NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap();

            let path = storage
                .store("contracts", "contract-4", "Offer.PDF", b"%PDF-1.4", at)
                .await
                .unwrap();

            assert!(path.starts_with("contracts/contract-4-2025-03-01-"));
            assert!(path.ends_with(".pdf"));
            assert_eq!(storage.read(&path).await.unwrap(), b"%PDF-1.4");

            storage.remove(&path).await.unwrap();
            assert!(storage.read(&path).await.is_err());
        }

        /// Expect paths escaping the upload root to be refused
        #[tokio::test]
        async fn refuses_parent_directory_paths() {
            let dir = tempfile::tempdir().unwrap();
            let storage = DocumentStorage::new(dir.path());

            assert!(storage.read("../secret.pdf").await.is_err());
        }
    }
}
