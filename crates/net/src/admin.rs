//! Authenticated admin endpoints: CRUD, toasts and image uploads

use std::fmt;
use std::path::Path;

use csquare_core::ToastPayload;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::error::{Error, Result};

/// Largest image accepted for upload
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// A collection the admin panel can write to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Events,
    Team,
    Faculty,
    Gallery,
    Toasts,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Events => "/events",
            Resource::Team => "/team",
            Resource::Faculty => "/faculty",
            Resource::Gallery => "/gallery",
            Resource::Toasts => "/toast",
        }
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path(), id)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

/// An image file ready to be sent as multipart form data
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file, guessing its content type from the extension
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Upload(format!("Cannot read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let content_type = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            _ => "application/octet-stream",
        };
        Ok(Self::new(file_name, content_type, bytes))
    }

    /// Reject non-images and files over [`MAX_UPLOAD_BYTES`] before sending
    pub fn validate(&self) -> Result<()> {
        if !self.content_type.starts_with("image/") {
            return Err(Error::Upload("Please select an image file".into()));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(Error::Upload("File size must be less than 5MB".into()));
        }
        Ok(())
    }

    fn into_form(self, field: &'static str) -> Result<Form> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?;
        Ok(Form::new().part(field, part))
    }
}

impl ApiClient {
    pub async fn create<D: Serialize + Sync>(&self, resource: Resource, draft: &D) -> Result<Value> {
        let body = self.post_json(resource.path(), draft).await?;
        info!(resource = %resource, "Created record");
        Ok(body)
    }

    pub async fn update<D: Serialize + Sync>(
        &self,
        resource: Resource,
        id: &str,
        draft: &D,
    ) -> Result<Value> {
        let body = self.put_json(&resource.item_path(id), draft).await?;
        info!(resource = %resource, id, "Updated record");
        Ok(body)
    }

    pub async fn remove(&self, resource: Resource, id: &str) -> Result<Value> {
        let body = self.delete(&resource.item_path(id)).await?;
        info!(resource = %resource, id, "Deleted record");
        Ok(body)
    }

    pub async fn create_toast(&self, payload: &ToastPayload) -> Result<Value> {
        self.create(Resource::Toasts, payload).await
    }

    pub async fn delete_toast(&self, id: &str) -> Result<Value> {
        self.remove(Resource::Toasts, id).await
    }

    /// Upload an image to the media host and return its hosted URL
    #[instrument(skip(self, image), fields(file = %image.file_name, size = image.bytes.len()))]
    pub async fn upload_image(&self, image: ImageUpload) -> Result<String> {
        image.validate()?;
        let request = self
            .request(Method::POST, "/upload", true)?
            .multipart(image.into_form("image")?);
        let body = self.execute(request, true).await?;

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("Upload failed")
                .to_string();
            return Err(Error::Api {
                status: 200,
                message: Some(message),
            });
        }
        hosted_url(&body, "/data/secure_url")
    }

    /// Upload a toast photo and return its hosted URL
    #[instrument(skip(self, image), fields(file = %image.file_name, size = image.bytes.len()))]
    pub async fn upload_toast_photo(&self, image: ImageUpload) -> Result<String> {
        image.validate()?;
        let request = self
            .request(Method::POST, "/toast/photo", true)?
            .multipart(image.into_form("photo")?);
        let body = self.execute(request, true).await?;
        hosted_url(&body, "/url")
    }
}

fn hosted_url(body: &Value, pointer: &str) -> Result<String> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::Api {
            status: 200,
            message: Some("Upload response carried no URL".into()),
        })
}
