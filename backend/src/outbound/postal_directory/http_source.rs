//! Reqwest-backed postal code directory adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain addresses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::DirectoryEntryDto;
use crate::domain::PostalCode;
use crate::domain::ports::{DirectoryLookup, PostalCodeDirectory, PostalCodeDirectoryError};
use crate::outbound::body_preview::status_message;

/// Directory adapter issuing `GET {base}/ws/{code}/json/`.
pub struct ViaCepDirectory {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl ViaCepDirectory {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        user_agent: impl Into<String>,
    ) -> Result<Self, PostalCodeDirectoryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| PostalCodeDirectoryError::invalid_request(error.to_string()))?;
        Ok(Self {
            client,
            base_url,
            user_agent: user_agent.into(),
        })
    }
}

#[async_trait]
impl PostalCodeDirectory for ViaCepDirectory {
    async fn lookup(
        &self,
        postal_code: &PostalCode,
    ) -> Result<DirectoryLookup, PostalCodeDirectoryError> {
        let url = lookup_url(&self.base_url, postal_code)?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_lookup(body.as_ref())
    }
}

fn lookup_url(base_url: &Url, postal_code: &PostalCode) -> Result<Url, PostalCodeDirectoryError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| {
            PostalCodeDirectoryError::invalid_request(format!(
                "base URL {base_url} cannot carry a path"
            ))
        })?
        .pop_if_empty()
        .extend(["ws", postal_code.as_ref(), "json", ""]);
    Ok(url)
}

fn parse_lookup(body: &[u8]) -> Result<DirectoryLookup, PostalCodeDirectoryError> {
    let decoded: DirectoryEntryDto = serde_json::from_slice(body).map_err(|error| {
        PostalCodeDirectoryError::decode(format!("invalid directory JSON payload: {error}"))
    })?;
    Ok(decoded.into_lookup())
}

fn map_transport_error(error: reqwest::Error) -> PostalCodeDirectoryError {
    if error.is_timeout() {
        PostalCodeDirectoryError::timeout(error.to_string())
    } else if error.is_decode() {
        PostalCodeDirectoryError::decode(error.to_string())
    } else {
        PostalCodeDirectoryError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PostalCodeDirectoryError {
    let message = status_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PostalCodeDirectoryError::timeout(message)
        }
        _ if status.is_client_error() => PostalCodeDirectoryError::invalid_request(message),
        _ => PostalCodeDirectoryError::transport(message),
    }
}
