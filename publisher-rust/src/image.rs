use crate::{client_utils::ensure_success, Config, PublishResult};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const IMAGE_SIZE: &str = "1200x630";

/// Image bytes held in memory between download and upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl ImageData {
    #[must_use]
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            filename: "hero.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
        }
    }
}

/// Keyword-addressed stock photo service that redirects to a random match.
/// No API key is needed.
pub struct ImageSource {
    base_url: String,
    client: Client,
}

impl ImageSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(config.image_base_url.clone(), client)
    }

    #[must_use]
    pub fn image_url(&self, query: &str) -> String {
        format!(
            "{}/{IMAGE_SIZE}/?{}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Download one image for `query`, following redirects.
    pub async fn fetch(&self, query: &str) -> PublishResult<ImageData> {
        let url = self.image_url(query);
        debug!(url = %url, "Fetching stock image");

        let response = self
            .client
            .get(&url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        let bytes = ensure_success(response).await?.bytes().await?;
        Ok(ImageData::jpeg(bytes.to_vec()))
    }
}
