use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Breed taxonomy as delivered by the remote API: breed keys mapped to their
/// sub-breed keys, in the order the source listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTaxonomy {
    breeds: Vec<(String, Vec<String>)>,
}

impl RawTaxonomy {
    pub fn new(breeds: Vec<(String, Vec<String>)>) -> Self {
        Self { breeds }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.breeds
            .iter()
            .map(|(breed, subs)| (breed.as_str(), subs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.breeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breeds.is_empty()
    }
}

impl<B, S> FromIterator<(B, Vec<S>)> for RawTaxonomy
where
    B: Into<String>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (B, Vec<S>)>>(iter: T) -> Self {
        Self {
            breeds: iter
                .into_iter()
                .map(|(breed, subs)| (breed.into(), subs.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

/// Display name of one queryable breed or sub-breed, e.g. `Shiba Inu`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreedId(String);

impl BreedId {
    pub fn new(breed: &str, sub_breed: Option<&str>) -> Self {
        match sub_breed {
            Some(sub) => Self(format!("{} {}", capitalize(breed), capitalize(sub))),
            None => Self(capitalize(breed)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segment used by the image endpoint: `Shiba Inu` -> `shiba/inu`.
    pub fn api_path(&self) -> String {
        self.0
            .to_lowercase()
            .chars()
            .map(|ch| if ch.is_whitespace() { '/' } else { ch })
            .collect()
    }
}

impl fmt::Display for BreedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Uppercases the first character only. Everything else is left as-is.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record a failure marker for the breed and keep going.
    #[default]
    Continue,
    /// Stop at the first failed breed; later breeds get no entry.
    Abort,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Continue => write!(f, "continue"),
            FailurePolicy::Abort => write!(f, "abort"),
        }
    }
}
