use serde::Serialize;

use crate::domain::BreedId;

/// Breeds the user picked, kept in the order they were first selected.
///
/// Equality is set equality; selection order does not matter.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    members: Vec<BreedId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `id` if selected, appends it otherwise. Returns whether `id` is
    /// selected afterwards.
    pub fn toggle(&mut self, id: &BreedId) -> bool {
        if let Some(pos) = self.members.iter().position(|member| member == id) {
            self.members.remove(pos);
            false
        } else {
            self.members.push(id.clone());
            true
        }
    }

    pub fn toggled(mut self, id: &BreedId) -> Self {
        self.toggle(id);
        self
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn cleared(self) -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &BreedId) -> bool {
        self.members.contains(id)
    }

    pub fn as_slice(&self) -> &[BreedId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.members.iter().all(|id| other.contains(id))
    }
}

impl Eq for SelectionSet {}

impl FromIterator<BreedId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = BreedId>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |mut set, id| {
            if !set.contains(&id) {
                set.members.push(id);
            }
            set
        })
    }
}
