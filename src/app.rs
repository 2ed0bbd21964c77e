use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::catalog::{Catalog, normalize};
use crate::dog_ceo::DogApiClient;
use crate::domain::{BreedId, FailurePolicy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageOutcome {
    Image { url: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchEntry {
    pub breed: BreedId,
    #[serde(flatten)]
    pub outcome: ImageOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// Every requested breed has an image.
    Complete,
    /// At least one breed carries a failure marker; the rest were still fetched.
    Partial,
    /// Fetching stopped at a failure before the last breed; later breeds have
    /// no entry. A failure on the last breed is reported as `Partial`.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    pub status: FetchStatus,
    pub fetched_at: String,
    pub entries: Vec<FetchEntry>,
}

impl FetchResult {
    pub fn get(&self, breed: &BreedId) -> Option<&ImageOutcome> {
        self.entries
            .iter()
            .find(|entry| &entry.breed == breed)
            .map(|entry| &entry.outcome)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.outcome, ImageOutcome::Failed { .. }))
    }
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Drives the remote API: builds the catalog and fetches images for a selection.
#[derive(Clone)]
pub struct App<C: DogApiClient> {
    client: C,
    policy: FailurePolicy,
}

impl<C: DogApiClient> App<C> {
    pub fn new(client: C, policy: FailurePolicy) -> Self {
        Self { client, policy }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Fetches and flattens the breed taxonomy. Any failure is logged and
    /// yields an empty catalog.
    pub async fn load_catalog(&self, sink: &dyn ProgressSink) -> Catalog {
        sink.event(ProgressEvent {
            message: "taxonomy.request".to_string(),
            elapsed: None,
        });
        let start = Instant::now();
        match self.client.fetch_taxonomy().await {
            Ok(raw) => {
                let catalog = normalize(&raw);
                info!(
                    breeds = raw.len(),
                    entries = catalog.len(),
                    "breed catalog loaded"
                );
                sink.event(ProgressEvent {
                    message: format!("taxonomy.response entries={}", catalog.len()),
                    elapsed: Some(start.elapsed()),
                });
                catalog
            }
            Err(err) => {
                error!(error = %err, "failed to fetch breed list");
                sink.event(ProgressEvent {
                    message: format!("taxonomy.error {err}"),
                    elapsed: Some(start.elapsed()),
                });
                Catalog::default()
            }
        }
    }

    /// Fetches one image per breed, strictly in the given order.
    ///
    /// Request `i + 1` is issued only after request `i` has resolved. The
    /// result is returned once the whole batch is done; nothing is published
    /// in between.
    pub async fn fetch_all(&self, selection: &[BreedId], sink: &dyn ProgressSink) -> FetchResult {
        let mut entries = Vec::with_capacity(selection.len());
        let mut status = FetchStatus::Complete;

        for breed in selection {
            sink.event(ProgressEvent {
                message: format!("image.request breed={breed}"),
                elapsed: None,
            });
            let start = Instant::now();
            let outcome = match self.client.fetch_random_image(breed).await {
                Ok(url) => ImageOutcome::Image { url },
                Err(err) => {
                    warn!(breed = %breed, error = %err, "image fetch failed");
                    ImageOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            let failed = matches!(outcome, ImageOutcome::Failed { .. });
            sink.event(ProgressEvent {
                message: format!(
                    "image.response breed={breed} ok={} latency_ms={}",
                    !failed,
                    start.elapsed().as_millis()
                ),
                elapsed: Some(start.elapsed()),
            });
            entries.push(FetchEntry {
                breed: breed.clone(),
                outcome,
            });

            if failed {
                match self.policy {
                    FailurePolicy::Continue => status = FetchStatus::Partial,
                    FailurePolicy::Abort if entries.len() < selection.len() => {
                        status = FetchStatus::Aborted;
                        break;
                    }
                    FailurePolicy::Abort => status = FetchStatus::Partial,
                }
            }
        }

        info!(
            requested = selection.len(),
            fetched = entries.len(),
            status = ?status,
            "image fetch finished"
        );

        FetchResult {
            status,
            fetched_at: iso_timestamp(),
            entries,
        }
    }
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawTaxonomy;
    use crate::error::DogError;
    use crate::output::JsonOutput;
    use async_trait::async_trait;

    struct BrokenTaxonomy;

    #[async_trait]
    impl DogApiClient for BrokenTaxonomy {
        async fn fetch_taxonomy(&self) -> Result<RawTaxonomy, DogError> {
            Err(DogError::TaxonomyStatus {
                status: 500,
                message: "boom".to_string(),
            })
        }

        async fn fetch_random_image(&self, breed: &BreedId) -> Result<String, DogError> {
            Ok(format!("https://images.dog.ceo/breeds/{}/1.jpg", breed.api_path()))
        }
    }

    #[tokio::test]
    async fn taxonomy_failure_leaves_catalog_empty() {
        let app = App::new(BrokenTaxonomy, FailurePolicy::Continue);
        let catalog = app.load_catalog(&JsonOutput).await;
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn empty_selection_is_complete() {
        let app = App::new(BrokenTaxonomy, FailurePolicy::Abort);
        let result = app.fetch_all(&[], &JsonOutput).await;
        assert!(result.is_empty());
        assert_eq!(result.status, FetchStatus::Complete);
    }
}
