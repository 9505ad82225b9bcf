use serde::{Deserialize, Serialize};

/// Submission had nothing left to send once blank entries were dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no URLs or keywords provided")]
pub struct EmptyRequest;

/// Validated bulk acquisition request, as transmitted to `POST /scrape`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcquisitionJob {
    urls: Vec<String>,
    keywords: Vec<String>,
}

impl AcquisitionJob {
    /// Trims every entry, drops blank ones and rejects a job with nothing left.
    pub fn from_raw<U, K>(urls: U, keywords: K) -> Result<Self, EmptyRequest>
    where
        U: IntoIterator,
        U::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        let urls = clean_entries(urls);
        let keywords = clean_entries(keywords);
        if urls.is_empty() && keywords.is_empty() {
            return Err(EmptyRequest);
        }
        Ok(Self { urls, keywords })
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

fn clean_entries<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    raw.into_iter()
        .map(|entry| entry.as_ref().trim().to_owned())
        .filter(|entry| !entry.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AcceptanceStatus {
    Accepted,
    Rejected,
}

impl From<String> for AcceptanceStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "accepted" | "started" | "queued" | "success" => AcceptanceStatus::Accepted,
            _ => AcceptanceStatus::Rejected,
        }
    }
}

/// The service's answer to a submission. Not polled any further.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobAcceptance {
    pub status: AcceptanceStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub task_id: Option<String>,
}

impl JobAcceptance {
    pub fn is_accepted(&self) -> bool {
        self.status == AcceptanceStatus::Accepted
    }
}
