use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::domain::{BreedId, RawTaxonomy};
use crate::error::DogError;

pub const DEFAULT_BASE_URL: &str = "https://dog.ceo/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait DogApiClient: Send + Sync {
    async fn fetch_taxonomy(&self) -> Result<RawTaxonomy, DogError>;
    /// Returns the URL of one random image for `breed`.
    async fn fetch_random_image(&self, breed: &BreedId) -> Result<String, DogError>;
}

#[derive(Clone)]
pub struct DogCeoHttpClient {
    client: Client,
    base_url: String,
}

impl DogCeoHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DogError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("dog-fetch/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| DogError::ClientSetup(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| DogError::ClientSetup(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn taxonomy_url(base_url: &str) -> String {
        format!("{}/breeds/list/all", base_url.trim_end_matches('/'))
    }

    pub fn image_url(base_url: &str, breed: &BreedId) -> String {
        format!(
            "{}/breed/{}/images/random",
            base_url.trim_end_matches('/'),
            breed.api_path()
        )
    }

    async fn get(&self, url: &str) -> Result<Response, reqwest::Error> {
        debug!(url, "GET");
        self.client.get(url).send().await
    }
}

#[async_trait]
impl DogApiClient for DogCeoHttpClient {
    async fn fetch_taxonomy(&self) -> Result<RawTaxonomy, DogError> {
        let url = Self::taxonomy_url(&self.base_url);
        let response = self
            .get(&url)
            .await
            .map_err(|err| DogError::TaxonomyHttp(err.to_string()))?;
        let response = handle_status(response, |status, message| DogError::TaxonomyStatus {
            status,
            message,
        })
        .await?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| DogError::MalformedTaxonomy(err.to_string()))?;
        parse_taxonomy(&body)
    }

    async fn fetch_random_image(&self, breed: &BreedId) -> Result<String, DogError> {
        let url = Self::image_url(&self.base_url, breed);
        let response = self
            .get(&url)
            .await
            .map_err(|err| DogError::ImageHttp(err.to_string()))?;
        let response = handle_status(response, |status, message| DogError::ImageStatus {
            status,
            message,
        })
        .await?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| DogError::MalformedImage(err.to_string()))?;
        parse_image(&body)
    }
}

async fn handle_status(
    response: Response,
    to_error: fn(u16, String) -> DogError,
) -> Result<Response, DogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
    Err(to_error(status.as_u16(), message))
}

/// Reads `{"message": {"breed": ["sub", ...], ...}}`, keeping key order.
pub fn parse_taxonomy(body: &Value) -> Result<RawTaxonomy, DogError> {
    check_status(body).map_err(DogError::MalformedTaxonomy)?;
    let message = body
        .get("message")
        .and_then(|value| value.as_object())
        .ok_or_else(|| DogError::MalformedTaxonomy("`message` is not an object".to_string()))?;

    let mut breeds = Vec::with_capacity(message.len());
    for (breed, subs) in message {
        let subs = subs
            .as_array()
            .ok_or_else(|| {
                DogError::MalformedTaxonomy(format!("sub-breeds of `{breed}` are not a list"))
            })?
            .iter()
            .map(|sub| {
                sub.as_str().map(str::to_string).ok_or_else(|| {
                    DogError::MalformedTaxonomy(format!("non-string sub-breed under `{breed}`"))
                })
            })
            .collect::<Result<Vec<_>, DogError>>()?;
        breeds.push((breed.clone(), subs));
    }
    Ok(RawTaxonomy::new(breeds))
}

/// Reads `{"message": "<image url>"}`.
pub fn parse_image(body: &Value) -> Result<String, DogError> {
    check_status(body).map_err(DogError::MalformedImage)?;
    body.get("message")
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| DogError::MalformedImage("`message` is not a string".to_string()))
}

// Dog CEO bodies carry `"status": "success"`; anything else is an error payload.
fn check_status(body: &Value) -> Result<(), String> {
    match body.get("status").and_then(|value| value.as_str()) {
        None | Some("success") => Ok(()),
        Some(other) => Err(format!(
            "status `{other}`: {}",
            body.get("message")
                .and_then(|value| value.as_str())
                .unwrap_or("no message")
        )),
    }
}
