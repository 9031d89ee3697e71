use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};

use crate::catalog::error::CatalogError;
use crate::catalog::product::ProductPage;
use crate::catalog::query::CatalogRequest;
use crate::config::CatalogConfig;

/// Source of catalog pages.
///
/// The fetch coordinator only talks to this trait, so tests can script
/// response timing without a network.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<ProductPage, CatalogError>;
}

/// `reqwest`-backed client for `GET {base_url}/products`.
pub struct HttpCatalogClient {
    client: Client,
    products_url: Url,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let products_url = products_url(&config.base_url)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|source| CatalogError::Connection { source })?;

        Ok(Self {
            client,
            products_url,
        })
    }

    pub fn products_url(&self) -> &Url {
        &self.products_url
    }

    fn url_for(&self, request: &CatalogRequest) -> Url {
        let mut url = self.products_url.clone();
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in request.query_pairs() {
                query.append_pair(name, &value);
            }
        }
        url
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<ProductPage, CatalogError> {
        let url = self.url_for(request);
        tracing::debug!(url = %url, "fetching catalog page");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| CatalogError::Connection { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Connection { source })?;

        serde_json::from_slice::<ProductPage>(&body).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

fn products_url(base_url: &str) -> Result<Url, CatalogError> {
    let joined = format!("{}/products", base_url.trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| CatalogError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Pulls `message` out of a JSON error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    const MAX_LEN: usize = 200;

    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.trim().to_string());

    if message.chars().count() > MAX_LEN {
        message.chars().take(MAX_LEN).collect::<String>() + "..."
    } else {
        message
    }
}
