use std::collections::BTreeSet;

use crate::ArtifactId;

/// Identifiers with a download currently running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InFlightSet {
    members: BTreeSet<ArtifactId>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` busy. Returns `false` if it already was.
    pub fn try_begin(&mut self, id: &ArtifactId) -> bool {
        self.members.insert(id.clone())
    }

    pub fn finish(&mut self, id: &ArtifactId) -> bool {
        self.members.remove(id)
    }

    pub fn contains(&self, id: &ArtifactId) -> bool {
        self.members.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Busy ids in ascending order.
    pub fn ids(&self) -> Vec<ArtifactId> {
        self.members.iter().cloned().collect()
    }
}
