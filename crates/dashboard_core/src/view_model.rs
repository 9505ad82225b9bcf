use crate::{resolve_filename, Artifact, ArtifactId, ArtifactKind, CollectionState, InFlightSet};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardViewModel {
    pub media: CollectionState<Artifact>,
    pub documents: CollectionState<Artifact>,
    pub busy_media: Vec<ArtifactId>,
    pub busy_documents: Vec<ArtifactId>,
    pub report_busy: bool,
}

impl DashboardViewModel {
    pub fn media_rows(&self) -> Vec<ArtifactRowView> {
        rows(ArtifactKind::Media, &self.media.items, &self.busy_media)
    }

    pub fn document_rows(&self) -> Vec<ArtifactRowView> {
        rows(ArtifactKind::Document, &self.documents.items, &self.busy_documents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRowView {
    pub id: ArtifactId,
    pub name: String,
    pub source_url: String,
    pub size_bytes: Option<u64>,
    pub downloadable: bool,
    pub busy: bool,
}

impl ArtifactRowView {
    pub fn new(kind: ArtifactKind, artifact: &Artifact, in_flight: &InFlightSet) -> Self {
        Self::build(kind, artifact, in_flight.contains(&artifact.id))
    }

    fn build(kind: ArtifactKind, artifact: &Artifact, busy: bool) -> Self {
        let name = artifact.display_name.clone().unwrap_or_else(|| {
            resolve_filename(
                kind,
                &artifact.id,
                &artifact.source_url,
                artifact.file_name.as_deref(),
            )
        });
        Self {
            id: artifact.id.clone(),
            name,
            source_url: artifact.source_url.clone(),
            size_bytes: artifact.file_size_bytes,
            downloadable: artifact.is_downloadable(),
            busy,
        }
    }
}

fn rows(kind: ArtifactKind, items: &[Artifact], busy: &[ArtifactId]) -> Vec<ArtifactRowView> {
    items
        .iter()
        .map(|artifact| ArtifactRowView::build(kind, artifact, busy.contains(&artifact.id)))
        .collect()
}
