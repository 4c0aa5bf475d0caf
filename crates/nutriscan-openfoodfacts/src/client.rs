//! HTTP client for the Open Food Facts product API.
//!
//! Issues one `GET /api/v0/product/{barcode}.json` per lookup with a bounded
//! timeout and a distinguishing `User-Agent`, and classifies failures into
//! [`FetchError`]. An unknown barcode is a normal outcome (`Ok(None)`).

use std::time::Duration;

use nutriscan_core::Barcode;
use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::types::{ProductResponse, RawProduct};

/// Client for the Open Food Facts product lookup endpoint.
///
/// The base URL, timeout and `User-Agent` come from configuration, so tests
/// can point the client at a mock server.
#[derive(Debug, Clone)]
pub struct OpenFoodFactsClient {
    client: Client,
    base_url: Url,
}

impl OpenFoodFactsClient {
    /// Creates a client with a custom base URL and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::Unexpected`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::ClientBuild)?;

        // Normalise to exactly one trailing slash so `join` appends below the
        // configured path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| FetchError::Unexpected {
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self { client, base_url })
    }

    /// Looks up a product by barcode.
    ///
    /// Returns `Ok(None)` when the database reports the product as unknown.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Timeout`] if the request exceeds the client timeout.
    /// - [`FetchError::Upstream`] on a non-2xx HTTP status.
    /// - [`FetchError::Network`] if the service cannot be reached.
    /// - [`FetchError::Unexpected`] if the body is not valid JSON or anything
    ///   else goes wrong.
    pub async fn fetch_product(&self, barcode: &Barcode) -> Result<Option<RawProduct>, FetchError> {
        let url = self.product_url(barcode)?;
        tracing::debug!(%barcode, %url, "looking up product");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%barcode, status = status.as_u16(), "food database returned error status");
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }

        let body = response.text().await.map_err(FetchError::from_transport)?;
        let envelope: ProductResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Unexpected {
                message: format!("invalid product response for {barcode}: {e}"),
            })?;

        let product = envelope.into_product();
        if product.is_some() {
            tracing::info!(%barcode, "product found");
        } else {
            tracing::info!(%barcode, "product not found in food database");
        }
        Ok(product)
    }

    fn product_url(&self, barcode: &Barcode) -> Result<Url, FetchError> {
        self.base_url
            .join(&format!("api/v0/product/{}.json", barcode.as_str()))
            .map_err(|e| FetchError::Unexpected {
                message: format!("cannot build product URL for {barcode}: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barcode(value: &str) -> Barcode {
        Barcode::parse(value).expect("test barcode should be valid")
    }

    #[test]
    fn product_url_appends_api_path() {
        let client = OpenFoodFactsClient::with_base_url("https://world.openfoodfacts.org", 10, "t")
            .expect("client construction should not fail");
        let url = client.product_url(&barcode("3017620422003")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://world.openfoodfacts.org/api/v0/product/3017620422003.json"
        );
    }

    #[test]
    fn product_url_keeps_base_path_prefix() {
        let client = OpenFoodFactsClient::with_base_url("http://localhost:8080/off/", 10, "t")
            .expect("client construction should not fail");
        let url = client.product_url(&barcode("012345678905")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/off/api/v0/product/012345678905.json"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = OpenFoodFactsClient::with_base_url("not a url", 10, "t");
        assert!(matches!(result, Err(FetchError::Unexpected { .. })));
    }
}
