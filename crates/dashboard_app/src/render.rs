use chrono::{DateTime, Utc};
use dashboard_core::{
    Artifact, ArtifactKind, ArtifactRowView, CollectionState, DashboardViewModel,
    DirectDownloadOutcome, JobAcceptance, ReportStatus, ServiceHealth,
};
use dashboard_engine::Notification;

/// Text lines for the whole dashboard: both collections and the report state.
pub fn render(view: &DashboardViewModel) -> Vec<String> {
    let mut lines = render_collection(ArtifactKind::Media, &view.media, &view.media_rows());
    lines.extend(render_collection(
        ArtifactKind::Document,
        &view.documents,
        &view.document_rows(),
    ));
    if view.report_busy {
        lines.push("Reports: downloading".to_string());
    }
    lines
}

pub fn render_collection(
    kind: ArtifactKind,
    state: &CollectionState<Artifact>,
    rows: &[ArtifactRowView],
) -> Vec<String> {
    let title = match kind {
        ArtifactKind::Media => "Media",
        ArtifactKind::Document => "Documents",
    };
    let loading = if state.is_loading { " (loading)" } else { "" };
    let mut lines = vec![format!("{title}: {} item(s){loading}", rows.len())];
    if rows.is_empty() && !state.is_loading {
        lines.push("  (none yet)".to_string());
    }
    for (row, artifact) in rows.iter().zip(&state.items) {
        lines.push(format_row(row, artifact.retrieved_at));
    }
    lines
}

fn format_row(row: &ArtifactRowView, retrieved_at: Option<DateTime<Utc>>) -> String {
    let mut details = Vec::new();
    if let Some(size) = row.size_bytes {
        details.push(format!("{} B", format_with_commas(size)));
    }
    if let Some(at) = retrieved_at {
        details.push(at.format("%Y-%m-%d %H:%M").to_string());
    }
    if !row.downloadable {
        details.push("not stored".to_string());
    }
    if row.busy {
        details.push("downloading".to_string());
    }

    let mut line = format!("  [{}] {} <{}>", row.id, row.name, row.source_url);
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }
    line
}

pub fn render_health(health: &ServiceHealth) -> String {
    let state = if health.is_healthy() { "up" } else { "degraded" };
    match &health.version {
        Some(version) => format!("Service {state}: {} (version {version})", health.message),
        None => format!("Service {state}: {}", health.message),
    }
}

pub fn render_acceptance(acceptance: &JobAcceptance) -> String {
    let verdict = if acceptance.is_accepted() {
        "accepted"
    } else {
        "rejected"
    };
    match &acceptance.task_id {
        Some(task) => format!("Job {verdict} (task {task}): {}", acceptance.message),
        None => format!("Job {verdict}: {}", acceptance.message),
    }
}

pub fn render_direct_download(outcome: &DirectDownloadOutcome) -> String {
    match (&outcome.filename, outcome.success) {
        (Some(name), true) => format!("Stored {name}: {}", outcome.message),
        (None, true) => format!("Stored: {}", outcome.message),
        (_, false) => format!("Not stored: {}", outcome.message),
    }
}

pub fn render_report_status(status: &ReportStatus) -> String {
    format!("Reports {}: {}", status.status, status.message)
}

pub fn render_notification(notification: &Notification) -> String {
    format!("error: {notification}")
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
