use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use super::{MediaAsset, MediaStore, MediaUpload};
use crate::config::MediaSettings;
use crate::errors::internal::MediaError;

/// Sign request parameters: sorted `key=value` pairs joined by `&`, followed by the secret
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut params = params.to_vec();
    params.sort_by(|a, b| a.0.cmp(b.0));
    let joined = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct HostErrorBody {
    error: HostErrorMessage,
}

#[derive(Debug, Deserialize)]
struct HostErrorMessage {
    message: String,
}

/// Media store backed by the Cloudinary upload API
pub struct CloudinaryMediaStore {
    settings: MediaSettings,
    client: reqwest::Client,
}

impl CloudinaryMediaStore {
    pub fn new(settings: MediaSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.settings.api_base, self.settings.cloud_name, action
        )
    }

    async fn rejection(response: reqwest::Response) -> MediaError {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<HostErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or(body),
            Err(e) => e.to_string(),
        };
        MediaError::Rejected { status, message }
    }
}

#[async_trait]
impl MediaStore for CloudinaryMediaStore {
    async fn upload(&self, upload: MediaUpload) -> Result<MediaAsset, MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[
                ("folder", self.settings.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.settings.api_secret,
        );

        let mut part = Part::bytes(upload.bytes).file_name(upload.filename.clone());
        if let Some(content_type) = upload.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| MediaError::Upload(format!("Invalid content type: {}", e)))?;
        }

        let form = Form::new()
            .text("api_key", self.settings.api_key.clone())
            .text("folder", self.settings.folder.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Upload(format!("Unreadable upload response: {}", e)))?;

        tracing::info!("Uploaded {} as {}", upload.filename, body.public_id);
        Ok(MediaAsset {
            url: body.secure_url,
            handle: body.public_id,
        })
    }

    async fn delete(&self, handle: &str) -> Result<(), MediaError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", handle), ("timestamp", timestamp.as_str())],
            &self.settings.api_secret,
        );

        let form = Form::new()
            .text("public_id", handle.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.settings.api_key.clone())
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Delete {
                handle: handle.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: DestroyResponse = response.json().await.map_err(|e| MediaError::Delete {
            handle: handle.to_string(),
            message: format!("Unreadable destroy response: {}", e),
        })?;

        match body.result.as_str() {
            "ok" => {
                tracing::info!("Deleted media {}", handle);
                Ok(())
            }
            "not found" => {
                tracing::warn!("Media {} was already gone", handle);
                Ok(())
            }
            other => Err(MediaError::Delete {
                handle: handle.to_string(),
                message: format!("unexpected result {:?}", other),
            }),
        }
    }
}

impl fmt::Debug for CloudinaryMediaStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryMediaStore")
            .field("settings", &self.settings)
            .finish()
    }
}
