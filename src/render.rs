//! Client for the external image-render service.
//!
//! The service exposes named recipes that take string and URL parameters
//! and return raw image bytes. Callers probe `get_status()` first; when
//! the probe fails they emit a localized "API offline" embed and skip the
//! draw instead of failing the surrounding command or loop.

use reqwest::Client;

use crate::error::AppError;

/// Recipe names understood by the render service.
pub mod recipe {
    pub const GUILD_BANNER: &str = "guild_banner";
    pub const ECONOMY_PROFILE: &str = "economy_profile";
    pub const LEVEL_CARD: &str = "level_card";
}

/// HTTP client for the render service.
#[derive(Clone)]
pub struct RenderClient {
    http: Client,
    base_url: String,
}

impl RenderClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Probes the render service.
    ///
    /// # Returns
    /// - `true` - service answered the status endpoint with success
    /// - `false` - any transport or non-2xx failure
    pub async fn get_status(&self) -> bool {
        match self.http.get(format!("{}/status", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Draws a named recipe and returns the raw image bytes.
    ///
    /// # Arguments
    /// - `recipe` - one of the [`recipe`] constants
    /// - `params` - recipe-specific string and URL parameters
    ///
    /// # Returns
    /// - `Ok(Vec<u8>)` - rendered image bytes
    /// - `Err(AppError)` - transport failure or non-2xx response
    pub async fn draw(&self, recipe: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, AppError> {
        let resp = self
            .http
            .post(format!("{}/draw/{}", self.base_url, recipe))
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.bytes().await?.to_vec())
    }
}
