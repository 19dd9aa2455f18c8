//! HTTP client for the transform backend

use crate::config::BackendConfig;
use anyhow::Context;
use pdftools_core::backend::{backend_error, CSRF_HEADER};
use pdftools_core::{
    content_disposition_filename, endpoint_url, parse_status, PdfStatus, ToolRequest, Upload,
};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

/// A transformed file returned by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            csrf_token: config.csrf_token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn form(request: &ToolRequest) -> anyhow::Result<Form> {
        let mut form = Form::new();

        for (field, upload) in request.files() {
            let part = Part::bytes(upload.bytes.clone())
                .file_name(upload.name.clone())
                .mime_str(upload.content_type())?;
            form = form.part(field, part);
        }

        for (field, value) in request.fields() {
            form = form.text(field, value);
        }

        Ok(form)
    }

    async fn send(&self, request: &ToolRequest) -> anyhow::Result<reqwest::Response> {
        request.validate()?;

        let url = endpoint_url(&self.base_url, request.endpoint());
        debug!(%url, "Sending request");

        let mut builder = self.http.post(&url).multipart(Self::form(request)?);
        if let Some(token) = &self.csrf_token {
            builder = builder.header(CSRF_HEADER, token);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(backend_error(status.as_u16(), &body).into());
        }

        Ok(response)
    }

    /// Submit a tool request and collect the transformed file
    pub async fn submit(&self, request: &ToolRequest) -> anyhow::Result<Download> {
        let response = self.send(request).await?;

        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(content_disposition_filename)
            .unwrap_or_else(|| request.default_filename());

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?
            .to_vec();

        info!(%filename, size = bytes.len(), "Received {}", request.endpoint());
        Ok(Download { filename, bytes })
    }

    /// Ask whether a file is password protected
    pub async fn check_status(&self, file: Upload) -> anyhow::Result<PdfStatus> {
        let request = ToolRequest::CheckStatus { file };
        let response = self.send(&request).await?;
        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        Ok(parse_status(&body)?)
    }
}
