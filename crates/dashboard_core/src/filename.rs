use url::Url;

use crate::{ArtifactId, ArtifactKind};

/// Name the report archive is saved under.
pub const REPORT_FILENAME: &str = "reports.zip";

/// Picks the name a downloaded artifact is saved as.
///
/// Order: explicit suggestion, then the last path segment of `source_url`,
/// then `{kind}_{id}.{ext}`.
pub fn resolve_filename(
    kind: ArtifactKind,
    item_id: &ArtifactId,
    source_url: &str,
    suggested: Option<&str>,
) -> String {
    if let Some(name) = suggested.and_then(sanitize_filename) {
        return name;
    }

    match last_path_segment(source_url).and_then(|segment| sanitize_filename(&segment)) {
        Some(name) if has_extension(&name) => name,
        Some(name) => format!("{name}.{}", kind.extension()),
        None => fallback_filename(kind, item_id),
    }
}

pub fn fallback_filename(kind: ArtifactKind, item_id: &ArtifactId) -> String {
    let id = sanitize_filename(item_id.as_str()).unwrap_or_else(|| "unknown".to_string());
    format!("{}_{}.{}", kind.label(), id, kind.extension())
}

fn last_path_segment(source_url: &str) -> Option<String> {
    let parsed = Url::parse(source_url.trim()).ok()?;
    let segment = parsed.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }
    // `my%20report.pdf` is saved as `my report.pdf`; invalid UTF-8 keeps the raw segment.
    match urlencoding::decode(segment) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(segment.to_string()),
    }
}

fn has_extension(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && !ext.is_empty(),
        None => false,
    }
}

fn sanitize_filename(input: &str) -> Option<String> {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        return None;
    }
    if cleaned.len() > 120 {
        let mut cut = 120;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
    }
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    Some(cleaned)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}
