//! HTTP access to the external processing service.

use std::net::IpAddr;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::core::{FilterChoice, SubmissionTicket};
use crate::processing::Endpoints;
use crate::utils::{ClientConfig, StudioError, StudioResult, SubmitFailure};

/// One "apply filter F to file S" request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub mime: &'static str,
    pub data: Bytes,
    pub filter: FilterChoice,
}

impl From<&SubmissionTicket> for UploadRequest {
    fn from(ticket: &SubmissionTicket) -> Self {
        Self {
            filename: ticket.selection.name().to_string(),
            mime: ticket.selection.mime(),
            data: ticket.selection.data().clone(),
            filter: ticket.filter,
        }
    }
}

/// Extra details a successful upload may report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    pub original_filename: Option<String>,
    pub uploaded_image: Option<String>,
    pub processed_image: Option<String>,
}

/// Something that can apply a filter remotely.
#[async_trait]
pub trait ProcessingBackend: Send + Sync {
    async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, SubmitFailure>;
}

/// Body of `POST /upload`, success or handled failure.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    success: Option<bool>,
    error: Option<String>,
    original_filename: Option<String>,
    uploaded_image: Option<String>,
    processed_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// `reqwest`-backed client for the processing service.
#[derive(Debug, Clone)]
pub struct HttpProcessingClient {
    client: Client,
    endpoints: Endpoints,
}

impl HttpProcessingClient {
    pub fn new(config: &ClientConfig) -> StudioResult<Self> {
        let endpoints = Endpoints::from_config(config)?;
        let mut builder = Client::builder().timeout(config.timeout());
        // A server on this machine is never reached through a proxy
        if is_loopback(endpoints.base()) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| StudioError::config(format!("Cannot build HTTP client: {e}")))?;

        debug!("Processing client targets {}", endpoints.base());
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Asks `GET /health`; any answer other than `{"status": "ok"}` counts as down.
    pub async fn check_health(&self) -> bool {
        let response = match self.client.get(self.endpoints.health()).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("Health check answered {}", response.status());
                return false;
            }
            Err(e) => {
                debug!("Health check failed: {}", e);
                return false;
            }
        };

        matches!(response.json::<HealthResponse>().await, Ok(body) if body.status == "ok")
    }

    /// Downloads an already-published artifact.
    pub async fn fetch(&self, url: Url) -> StudioResult<Bytes> {
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(StudioError::http(format!("GET {} answered {}", url, response.status())));
        }
        Ok(response.bytes().await?)
    }

    fn form(request: UploadRequest) -> reqwest::Result<Form> {
        let len = request.data.len() as u64;
        let file = Part::stream_with_length(request.data, len)
            .file_name(request.filename)
            .mime_str(request.mime)?;

        Ok(Form::new()
            .part("file", file)
            .text("filter", request.filter.id()))
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

#[async_trait]
impl ProcessingBackend for HttpProcessingClient {
    async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, SubmitFailure> {
        let url = self.endpoints.upload();
        debug!("POST {} ({} bytes, filter {})", url, request.data.len(), request.filter);

        let form = Self::form(request).map_err(|e| SubmitFailure::transport(e.to_string()))?;
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SubmitFailure::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitFailure::transport(format!("server answered {status}: {body}")));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| SubmitFailure::transport(format!("malformed response: {e}")))?;

        match body.success {
            Some(true) => Ok(UploadReceipt {
                original_filename: body.original_filename,
                uploaded_image: body.uploaded_image,
                processed_image: body.processed_image,
            }),
            Some(false) => Err(SubmitFailure::server(
                body.error.unwrap_or_else(|| "Unknown error".to_string()),
            )),
            None => Err(SubmitFailure::transport("malformed response: missing success flag")),
        }
    }
}
