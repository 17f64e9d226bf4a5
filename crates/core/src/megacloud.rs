use reqwest::Client;
use reqwest::header::{ACCEPT, REFERER, USER_AGENT};
use tracing::{debug, info};

use crate::errors::{MegacloudError, Result};
use crate::model::SourceMetadata;

const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

#[derive(Clone)]
pub struct MegacloudClient {
    base_domain: String,
    client: Client,
}

impl MegacloudClient {
    /// creates a client for the given embed provider domain.
    pub fn new(base_domain: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| MegacloudError::BuildClient {
                context: "building reqwest client",
                source,
            })?;

        Ok(Self {
            base_domain: base_domain.into(),
            client,
        })
    }

    /// resolves an embed id into the episode's source metadata document.
    pub async fn fetch_sources(&self, embed_id: &str) -> Result<SourceMetadata> {
        info!(%embed_id, "requesting embed sources");
        let url = format!(
            "https://{}/embed-2/ajax/e-1/getSources?id={embed_id}",
            self.base_domain
        );

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json, text/javascript, */*; q=0.01")
            .header(USER_AGENT, UA)
            .header(REFERER, format!("https://{}/", self.base_domain))
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await
            .map_err(|source| MegacloudError::Request {
                context: format!("requesting embed sources for {embed_id}"),
                source,
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read error body>".to_string());

            return Err(MegacloudError::HttpStatus {
                context: format!("embed sources for {embed_id}"),
                status,
                body,
            });
        }

        let metadata: SourceMetadata =
            resp.json().await.map_err(|source| MegacloudError::Json {
                context: format!("parsing embed sources for {embed_id}"),
                source,
            })?;

        debug!(
            sources = metadata.sources.len(),
            tracks = metadata.tracks.len(),
            encrypted = metadata.encrypted,
            "decoded embed source document"
        );

        Ok(metadata)
    }
}
