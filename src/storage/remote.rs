//! HTTP implementation of `ToyStore` against the remote `toy` resource
//!
//! # Routes
//! ```text
//! GET    {base}?txt=..&labels=..&inStock=..&sortBy=..&sortDir=..   list
//! GET    {base}{id}                                                 get
//! POST   {base}                                                     create
//! PUT    {base}               (body carries `_id`)                  update
//! DELETE {base}{id}                                                 delete
//! ```

use crate::core::error::{
    CatalogError, CatalogResult, ConfigError, TransportError, ValidationError,
};
use crate::core::filter::FilterBy;
use crate::core::query::ToyQuery;
use crate::core::service::ToyStore;
use crate::core::toy::{Toy, ToyId};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

const BACKEND: &str = "http";

/// Remote toy store
#[derive(Debug, Clone)]
pub struct HttpToyStore {
    client: Client,
    base_url: String,
}

impl HttpToyStore {
    /// `base_url` points at the collection, e.g. `http://localhost:3030/api/toy/`.
    /// A trailing slash is added when missing.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CatalogResult<Self> {
        let base_url = base_url.into();
        let is_http = reqwest::Url::parse(&base_url)
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
        if !is_http {
            return Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: base_url,
                message: "must be an http(s) URL".to_string(),
            }
            .into());
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing client (connection pool, proxies, headers)
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &ToyId) -> String {
        format!("{}{}", self.base_url, id)
    }

    /// Map non-success statuses. A 404 only means "not found" when the
    /// request addressed a specific toy.
    async fn check(response: Response, id: Option<&ToyId>) -> CatalogResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(CatalogError::toy_not_found(id.as_str()));
            }
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        } else {
            body
        };
        tracing::warn!(status = status.as_u16(), %message, "Toy backend returned an error");
        Err(TransportError::new(BACKEND, message)
            .with_status(status.as_u16())
            .into())
    }
}

fn transport_error(err: reqwest::Error) -> CatalogError {
    let mut transport = TransportError::new(BACKEND, err.to_string());
    if let Some(status) = err.status() {
        transport = transport.with_status(status.as_u16());
    }
    transport.into()
}

#[async_trait]
impl ToyStore for HttpToyStore {
    async fn query(&self, filter: &FilterBy) -> CatalogResult<Vec<Toy>> {
        let pairs = ToyQuery::from_filter(filter).to_pairs();
        tracing::debug!(url = %self.base_url, ?pairs, "GET toys");

        let response = self
            .client
            .get(&self.base_url)
            .query(&pairs)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check(response, None).await?;
        response.json::<Vec<Toy>>().await.map_err(transport_error)
    }

    async fn get(&self, id: &ToyId) -> CatalogResult<Toy> {
        let response = self
            .client
            .get(self.item_url(id))
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check(response, Some(id)).await?;
        response.json::<Toy>().await.map_err(transport_error)
    }

    async fn create(&self, mut toy: Toy) -> CatalogResult<Toy> {
        // The backend owns id assignment
        toy.id = None;
        let response = self
            .client
            .post(&self.base_url)
            .json(&toy)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check(response, None).await?;
        response.json::<Toy>().await.map_err(transport_error)
    }

    async fn update(&self, toy: Toy) -> CatalogResult<Toy> {
        let id = toy.id.clone().ok_or_else(|| ValidationError::MissingArgument {
            argument: "_id".to_string(),
        })?;
        let response = self
            .client
            .put(&self.base_url)
            .json(&toy)
            .send()
            .await
            .map_err(transport_error)?;
        let response = Self::check(response, Some(&id)).await?;
        response.json::<Toy>().await.map_err(transport_error)
    }

    async fn delete(&self, id: &ToyId) -> CatalogResult<()> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(transport_error)?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
