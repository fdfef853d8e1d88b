//! Request descriptions
//!
//! An [`ApiRequest`] is a plain value: building one performs no I/O. The
//! client turns it into an HTTP call in [`crate::StorefrontClient::send`].

use crate::error::ClientError;
use reqwest::Method;
use std::path::Path;

/// Body attached to a request
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// JSON document
    Json(serde_json::Value),
    /// Multipart form carrying a single file
    Multipart(FileUpload),
}

/// A file sent as one part of a multipart form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    /// Form field name, e.g. `image[attachment]`
    pub field: String,
    /// File name reported to the server
    pub file_name: String,
    /// MIME type of the content
    pub mime: String,
    /// Raw file content
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Create an upload from bytes already in memory
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Upload` if the file cannot be read
    pub async fn from_path(field: impl Into<String>, path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Upload {
            path: path.display().to_string(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());

        Ok(Self::new(field, file_name, guess_mime(path), bytes))
    }
}

fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// A request against the storefront API, relative to the configured base URL
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path such as `/api/orders`
    pub path: String,
    /// Query string pairs, sent URL-encoded
    pub query: Vec<(String, String)>,
    /// Request body
    pub body: RequestBody,
}

impl ApiRequest {
    /// Create a request with no query and no body
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// `GET path`
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT path`
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE path`
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Builder: add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Builder: send a JSON body
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Builder: send a multipart form with one file
    #[must_use]
    pub fn multipart(mut self, upload: FileUpload) -> Self {
        self.body = RequestBody::Multipart(upload);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = ApiRequest::get("/api/countries").query("q[name_cont]", "United States");

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/api/countries");
        assert_eq!(
            request.query,
            vec![("q[name_cont]".to_string(), "United States".to_string())]
        );
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[test]
    fn test_json_body_replaces_previous_body() {
        let upload = FileUpload::new("image[attachment]", "cat.jpg", "image/jpeg", vec![1, 2]);
        let request = ApiRequest::post("/api/orders")
            .multipart(upload)
            .json(json!({"line_item": {"variant_id": 1}}));

        assert!(matches!(request.body, RequestBody::Json(_)));
    }

    #[test]
    fn test_mime_guessing() {
        assert_eq!(guess_mime(Path::new("thinking-cat.JPG")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("logo.png")), "image/png");
        assert_eq!(guess_mime(Path::new("README")), "application/octet-stream");
    }

    #[tokio::test]
    #[allow(clippy::unwrap_used)] // Test code
    async fn test_upload_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.jpeg");
        std::fs::write(&path, b"\xFF\xD8\xFF").unwrap();

        let upload = FileUpload::from_path("image[attachment]", &path).await.unwrap();
        assert_eq!(upload.file_name, "cat.jpeg");
        assert_eq!(upload.mime, "image/jpeg");
        assert_eq!(upload.bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[tokio::test]
    async fn test_missing_upload_is_an_error() {
        let missing = Path::new("/nonexistent/cat.jpg");
        let result = FileUpload::from_path("image[attachment]", missing).await;
        assert!(matches!(result, Err(ClientError::Upload { .. })));
    }
}
