use std::path::Path;
use serde::Serialize;
use reqwest::Url;
use tracing::info;

use crate::processing::HttpProcessingClient;
use crate::utils::{StudioError, StudioResult};

/// Where to fetch the processed artifact from and what to call the saved copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub source: String,
    pub file_name: String,
}

/// Downloads the published artifact to `dest`. Returns the number of bytes written.
pub async fn save_export(client: &HttpProcessingClient, request: &ExportRequest, dest: &Path) -> StudioResult<u64> {
    let url = Url::parse(&request.source)
        .map_err(|e| StudioError::http(format!("Invalid export source '{}': {}", request.source, e)))?;

    let data = client.fetch(url).await?;
    tokio::fs::write(dest, &data)
        .await
        .map_err(|e| StudioError::io(format!("Failed to write {}: {}", dest.display(), e)))?;

    info!("Exported {} ({} bytes) to {}", request.file_name, data.len(), dest.display());
    Ok(data.len() as u64)
}
