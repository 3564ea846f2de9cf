//! Multipart document uploads and file download responses.

use std::collections::HashMap;

use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::server::{
    error::{upload::UploadError, validation::ValidationError, Error},
    util::storage::UploadedFile,
};

/// Multipart field carrying an uploaded contract document
pub const DOCUMENT_FIELD: &str = "document";

/// A multipart form carrying one file plus plain text fields.
pub struct UploadForm {
    pub file: UploadedFile,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain `multipart`, keeping the file sent as `file_field` and every text field.
    pub async fn read(mut multipart: Multipart, file_field: &'static str) -> Result<Self, Error> {
        let mut file = None;
        let mut fields = HashMap::new();

        while let Some(field) = multipart.next_field().await.map_err(UploadError::from)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == file_field {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(UploadError::from)?;

                file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(UploadError::from)?;
                fields.insert(name, value);
            }
        }

        let file = file.ok_or(UploadError::MissingFile(file_field))?;

        Ok(Self { file, fields })
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Integer field that must be present.
    pub fn required_id(&self, name: &'static str) -> Result<i32, Error> {
        self.text(name)
            .and_then(|value| value.trim().parse().ok())
            .ok_or_else(|| ValidationError::field(name, "A valid id is required").into())
    }

    /// Checkbox style field, set when sent as `true`, `on` or `1`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.text(name).map(str::trim),
            Some("true") | Some("on") | Some("1")
        )
    }
}

/// Serve `body` as an attachment named `file_name`.
pub fn attachment(file_name: &str, content_type: &'static str, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name.replace('"', "")),
            ),
        ],
        body,
    )
        .into_response()
}
