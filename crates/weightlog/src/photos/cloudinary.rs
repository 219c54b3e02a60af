//! Cloudinary image host.
//!
//! Uses unsigned uploads: the account's upload preset decides where and how
//! images are stored, so no API secret is needed on this side.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use super::{ImageHost, PhotoUpload};
use crate::config::CloudinaryConfig;
use crate::error::{Error, Result};

const HOST_NAME: &str = "cloudinary";

/// Uploads photos to a Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryHost {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
    folder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryHost {
    /// Build a host from configuration.
    ///
    /// Returns `None` unless both the cloud name and the upload preset are
    /// set.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &CloudinaryConfig) -> Result<Option<Self>> {
        let (Some(cloud_name), Some(upload_preset)) = (&config.cloud_name, &config.upload_preset)
        else {
            return Ok(None);
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::upload_failure(HOST_NAME, format!("HTTP client: {e}")))?;

        info!("Cloudinary uploads enabled for cloud '{cloud_name}'");
        Ok(Some(Self {
            client,
            upload_url: upload_url(&config.api_base, cloud_name),
            upload_preset: upload_preset.clone(),
            folder: config.folder.clone(),
        }))
    }

    /// Endpoint photos are posted to.
    #[must_use]
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    fn form(&self, photo: &PhotoUpload) -> Result<Form> {
        let part = Part::bytes(photo.bytes().to_vec())
            .file_name(photo.file_name())
            .mime_str(photo.format().mime())
            .map_err(|e| Error::upload_failure(HOST_NAME, e.to_string()))?;

        let mut form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("public_id", photo.photo_ref().to_string());
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }
        Ok(form)
    }
}

fn upload_url(api_base: &str, cloud_name: &str) -> String {
    format!(
        "{}/{}/image/upload",
        api_base.trim_end_matches('/'),
        cloud_name
    )
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    fn name(&self) -> &'static str {
        HOST_NAME
    }

    async fn upload(&self, photo: &PhotoUpload) -> Result<String> {
        let form = self.form(photo)?;
        debug!("Uploading photo {} to {}", photo.photo_ref(), self.upload_url);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::upload_failure(HOST_NAME, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::upload_failure(HOST_NAME, e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map_or_else(|_| body.clone(), |e| e.error.message);
            return Err(Error::upload_failure(
                HOST_NAME,
                format!("HTTP {status}: {message}"),
            ));
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| Error::upload_failure(HOST_NAME, format!("unexpected response: {e}")))?;
        Ok(parsed.secure_url)
    }
}
