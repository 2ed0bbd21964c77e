#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use dog_fetch::app::{ProgressEvent, ProgressSink};
use dog_fetch::dog_ceo::{DEFAULT_BASE_URL, DogApiClient, DogCeoHttpClient};
use dog_fetch::domain::{BreedId, RawTaxonomy};
use dog_fetch::error::DogError;

/// In-memory Dog CEO stand-in that records every request it sees.
#[derive(Default)]
pub struct MockDogApi {
    taxonomy: Option<RawTaxonomy>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl MockDogApi {
    pub fn with_taxonomy(taxonomy: RawTaxonomy) -> Self {
        Self {
            taxonomy: Some(taxonomy),
            ..Self::default()
        }
    }

    /// Makes image requests for the breed at `api_path` fail with a 404.
    pub fn failing(mut self, api_path: &str) -> Self {
        self.failing.push(api_path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn image_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix("start ").map(str::to_string))
            .collect()
    }
}

#[async_trait]
impl DogApiClient for MockDogApi {
    async fn fetch_taxonomy(&self) -> Result<RawTaxonomy, DogError> {
        self.taxonomy
            .clone()
            .ok_or_else(|| DogError::TaxonomyHttp("connection refused".to_string()))
    }

    async fn fetch_random_image(&self, breed: &BreedId) -> Result<String, DogError> {
        let url = DogCeoHttpClient::image_url(DEFAULT_BASE_URL, breed);
        self.calls.lock().unwrap().push(format!("start {url}"));
        tokio::task::yield_now().await;
        self.calls.lock().unwrap().push(format!("end {url}"));

        let path = breed.api_path();
        if self.failing.contains(&path) {
            return Err(DogError::ImageStatus {
                status: 404,
                message: "Breed not found".to_string(),
            });
        }
        Ok(format!(
            "https://images.dog.ceo/breeds/{}/1.jpg",
            path.replace('/', "-")
        ))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn event(&self, event: ProgressEvent) {
        self.messages.lock().unwrap().push(event.message);
    }
}

pub fn akita_shiba() -> RawTaxonomy {
    [("akita", vec![]), ("shiba", vec!["inu"])]
        .into_iter()
        .collect()
}

pub fn breed(name: &str) -> BreedId {
    match name.split_once(' ') {
        Some((breed, sub)) => BreedId::new(breed, Some(sub)),
        None => BreedId::new(name, None),
    }
}
