//! Image generation port.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use switchboard_types::error::ImageGenError;

/// Fully resolved generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub model: String,
}

/// Per-request overrides. Unset fields keep the configured default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<u64>,
    pub model: Option<String>,
}

impl ImageOverrides {
    pub fn resolve(&self, defaults: &ImageOptions) -> ImageOptions {
        ImageOptions {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            seed: self.seed.unwrap_or(defaults.seed),
            model: self
                .model
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map_or_else(|| defaults.model.clone(), str::to_string),
        }
    }
}

/// Text-to-image backend. Returns the URL where the image can be fetched.
pub trait ImageGenerator: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> impl Future<Output = Result<String, ImageGenError>> + Send;
}

/// Object-safe version of [`ImageGenerator`].
pub trait ImageGeneratorDyn: Send + Sync {
    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
        options: &'a ImageOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, ImageGenError>> + Send + 'a>>;
}

impl<T: ImageGenerator> ImageGeneratorDyn for T {
    fn generate_boxed<'a>(
        &'a self,
        prompt: &'a str,
        options: &'a ImageOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, ImageGenError>> + Send + 'a>> {
        Box::pin(self.generate(prompt, options))
    }
}

/// Type-erased image generator.
pub struct BoxImageGenerator {
    inner: Box<dyn ImageGeneratorDyn>,
}

impl BoxImageGenerator {
    pub fn new<T: ImageGenerator + 'static>(generator: T) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }

    pub async fn generate(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<String, ImageGenError> {
        self.inner.generate_boxed(prompt, options).await
    }
}
