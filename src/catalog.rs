use serde::Serialize;

use crate::domain::{BreedId, RawTaxonomy};
use crate::error::DogError;

/// Flat, ordered list of every selectable breed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    breeds: Vec<BreedId>,
}

impl Catalog {
    pub fn breeds(&self) -> &[BreedId] {
        &self.breeds
    }

    pub fn len(&self) -> usize {
        self.breeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breeds.is_empty()
    }

    pub fn contains(&self, id: &BreedId) -> bool {
        self.breeds.contains(id)
    }

    /// Finds the catalog entry for user input given either as a display name
    /// (`shiba inu`) or as an API path (`shiba/inu`), ignoring case.
    pub fn resolve(&self, input: &str) -> Result<BreedId, DogError> {
        let wanted = input.trim().to_lowercase();
        self.breeds
            .iter()
            .find(|id| id.as_str().to_lowercase() == wanted || id.api_path() == wanted)
            .cloned()
            .ok_or_else(|| DogError::UnknownBreed(input.to_string()))
    }
}

/// Flattens the taxonomy into one entry per leaf.
///
/// A breed without sub-breeds yields itself; a breed with sub-breeds yields
/// one `Breed Sub` entry per sub-breed and never appears on its own. Source
/// order is kept as given.
pub fn normalize(raw: &RawTaxonomy) -> Catalog {
    let mut breeds = Vec::new();
    for (breed, subs) in raw.iter() {
        if subs.is_empty() {
            breeds.push(BreedId::new(breed, None));
        } else {
            breeds.extend(subs.iter().map(|sub| BreedId::new(breed, Some(sub))));
        }
    }
    Catalog { breeds }
}
