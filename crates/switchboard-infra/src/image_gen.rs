//! Pollinations text-to-image backend.
//!
//! The image URL is deterministic: `{base}/{prompt}?width=&height=&seed=&model=`.
//! Fetching it once makes Pollinations render the image and tells us
//! whether generation succeeded; the bytes themselves are discarded.

use std::time::Duration;

use switchboard_core::image::{ImageGenerator, ImageOptions};
use switchboard_types::config::ImageGenerationConfig;
use switchboard_types::error::ImageGenError;

#[derive(Debug, Clone)]
pub struct PollinationsGenerator {
    client: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl PollinationsGenerator {
    /// # Errors
    ///
    /// Returns [`ImageGenError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &ImageGenerationConfig) -> Result<Self, ImageGenError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageGenError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Public URL for `prompt` rendered with `options`.
    pub fn image_url(&self, prompt: &str, options: &ImageOptions) -> String {
        format!(
            "{}/{}?width={}&height={}&seed={}&model={}",
            self.base_url,
            urlencoding::encode(prompt),
            options.width,
            options.height,
            options.seed,
            urlencoding::encode(&options.model),
        )
    }

    fn map_transport(&self, err: reqwest::Error) -> ImageGenError {
        if err.is_timeout() {
            ImageGenError::Timeout(self.timeout_secs)
        } else {
            ImageGenError::Transport(err.to_string())
        }
    }
}

impl ImageGenerator for PollinationsGenerator {
    async fn generate(&self, prompt: &str, options: &ImageOptions) -> Result<String, ImageGenError> {
        if prompt.trim().is_empty() {
            return Err(ImageGenError::InvalidRequest("prompt is empty".to_string()));
        }

        let url = self.image_url(prompt, options);
        tracing::debug!(%url, "requesting image");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageGenError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Drain the body so a render that stalls mid-transfer still times out.
        let bytes = response.bytes().await.map_err(|e| self.map_transport(e))?;
        tracing::info!(bytes = bytes.len(), "image generated");

        Ok(url)
    }
}
