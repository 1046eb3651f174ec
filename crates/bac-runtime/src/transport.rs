// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Remote lookup transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Performs one remote lookup.
///
/// Implementations must always resolve: a failed lookup resolves to `None`,
/// never to an error or a future that hangs past `timeout`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Option<Value>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid lookup URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// JSON-over-HTTP GET transport.
///
/// Lookup URLs may be relative to a base URL, the way a browser resolves them
/// against the current page.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Option<Url>,
}

impl HttpTransport {
    pub fn new(base: Option<Url>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, base })
    }

    pub fn with_client(client: reqwest::Client, base: Option<Url>) -> Self {
        Self { client, base }
    }

    pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        let resolved = match &self.base {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|source| TransportError::Url {
            url: url.to_owned(),
            source,
        })
    }

    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, TransportError> {
        let url = self.resolve(url)?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, timeout: Duration) -> Option<Value> {
        match self.get_json(url, timeout).await {
            Ok(payload) => {
                debug!(%url, "remote lookup succeeded");
                Some(payload)
            }
            Err(err) => {
                warn!(%url, error = %err, "remote lookup failed");
                None
            }
        }
    }
}
