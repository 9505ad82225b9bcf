use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque artifact identifier. The service sends integers; anything that
/// round-trips as a string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for ArtifactId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ArtifactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Unsigned(u64),
            Signed(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// Which remote collection an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Media,
    Document,
}

impl ArtifactKind {
    /// Prefix used for generated file names (`video_7.mp4`).
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Media => "video",
            ArtifactKind::Document => "document",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Media => "mp4",
            ArtifactKind::Document => "pdf",
        }
    }

    /// Path segment of the collection on the extraction service.
    pub fn collection_segment(self) -> &'static str {
        match self {
            ArtifactKind::Media => "videos",
            ArtifactKind::Document => "pdfs",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Media => write!(f, "media"),
            ArtifactKind::Document => write!(f, "documents"),
        }
    }
}

/// A media file or document produced by the extraction service.
///
/// `storage_object_key` is only present once the service has persisted the
/// payload; until then the artifact is listed but not downloadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireArtifact")]
pub struct Artifact {
    pub id: ArtifactId,
    #[serde(rename = "url")]
    pub source_url: String,
    #[serde(rename = "title")]
    pub display_name: Option<String>,
    #[serde(rename = "filename")]
    pub file_name: Option<String>,
    #[serde(rename = "local_path")]
    pub storage_object_key: Option<String>,
    #[serde(rename = "size")]
    pub file_size_bytes: Option<u64>,
    pub retrieved_at: Option<DateTime<Utc>>,
    #[serde(rename = "meta")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Artifact {
    pub fn new(id: impl Into<ArtifactId>, source_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_url: source_url.into(),
            display_name: None,
            file_name: None,
            storage_object_key: None,
            file_size_bytes: None,
            retrieved_at: None,
            metadata: None,
        }
    }

    pub fn is_downloadable(&self) -> bool {
        self.storage_object_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Record as the service sends it. Every spelling of a field is its own
/// slot, so a record carrying two of them still decodes; the first one
/// present wins.
#[derive(Deserialize)]
struct WireArtifact {
    id: ArtifactId,
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    local_path: Option<String>,
    #[serde(default)]
    storage_key: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    file_size: Option<u64>,
    #[serde(default)]
    file_size_bytes: Option<u64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    retrieved_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    meta: Option<serde_json::Map<String, serde_json::Value>>,
}

impl From<WireArtifact> for Artifact {
    fn from(wire: WireArtifact) -> Self {
        Self {
            id: wire.id,
            source_url: wire.url,
            display_name: wire.title,
            file_name: wire.filename,
            storage_object_key: wire.local_path.or(wire.storage_key),
            file_size_bytes: wire.size.or(wire.file_size).or(wire.file_size_bytes),
            retrieved_at: wire.retrieved_at.or(wire.created_at),
            metadata: wire.meta,
        }
    }
}

// Timestamps without an offset are taken as UTC. Anything that is not a
// parsable string is dropped rather than failing the whole listing.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
