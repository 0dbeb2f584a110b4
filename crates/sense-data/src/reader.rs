//! Archive file discovery and parsing.
//!
//! Archive exports store posts as `window.YTD.tweets.part0 = [ ... ];`: a
//! variable assignment wrapping a JSON array. The payload is never treated as
//! code; everything after the first `=` must decode as JSON.

use std::path::{Path, PathBuf};

use sense_core::models::RawPost;
use sense_core::{Result, SenseError};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

const EXCERPT_CHARS: usize = 60;

// ── Public API ────────────────────────────────────────────────────────────────

/// Whether `name` is a post file of an archive export: `tweets.js` or
/// `tweets-part<N>.js`.
pub fn is_archive_file_name(name: &str) -> bool {
    archive_part_index(name).is_some()
}

/// Part number of an archive post file: 0 for `tweets.js`, `N` for
/// `tweets-part<N>.js`, `None` for anything else.
pub fn archive_part_index(name: &str) -> Option<u64> {
    if name == "tweets.js" {
        return Some(0);
    }
    let n = name.strip_prefix("tweets-part")?.strip_suffix(".js")?;
    if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    n.parse().ok()
}

/// Find all archive post files recursively under `dir`.
///
/// Files are ordered by part number, then by path, so later parts are read
/// after earlier ones.
pub fn find_archive_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Archive path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<(u64, PathBuf)> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let part = entry.file_name().to_str().and_then(archive_part_index)?;
            Some((part, entry.into_path()))
        })
        .collect();

    files.sort();
    files.into_iter().map(|(_, path)| path).collect()
}

/// Parse one assignment-wrapped archive payload into raw posts.
///
/// Fails with [`SenseError::MalformedArchive`] when the `=` is missing, the
/// remainder is not a JSON array, or a required field (`id`, `created_at`,
/// text) is absent from every element. Elements missing only some fields
/// are returned as-is for the normalizer to drop.
pub fn parse_archive(content: &str) -> Result<Vec<RawPost>> {
    let (_, assigned) = content.split_once('=').ok_or_else(|| {
        SenseError::MalformedArchive(format!(
            "missing assignment operator in \"{}\"",
            excerpt(content)
        ))
    })?;

    let trimmed = assigned.trim();
    let json = trimmed.strip_suffix(';').unwrap_or(trimmed);

    let document: Value = serde_json::from_str(json).map_err(|e| {
        SenseError::MalformedArchive(format!("invalid JSON ({}) in \"{}\"", e, excerpt(json)))
    })?;

    let Value::Array(elements) = document else {
        return Err(SenseError::MalformedArchive(format!(
            "expected a JSON array, found \"{}\"",
            excerpt(json)
        )));
    };

    let posts: Vec<RawPost> = elements.iter().map(extract_raw_post).collect();

    if !posts.is_empty() {
        for (field, present) in [
            ("id", posts.iter().any(|p| p.id.is_some())),
            ("created_at", posts.iter().any(|p| p.created_at.is_some())),
            ("full_text/text", posts.iter().any(|p| p.text.is_some())),
        ] {
            if !present {
                return Err(SenseError::MalformedArchive(format!(
                    "field `{}` missing from every element",
                    field
                )));
            }
        }
    }

    debug!("Parsed {} raw posts", posts.len());
    Ok(posts)
}

/// Read and parse every archive file at `path`.
///
/// `path` may be a single payload file or an export directory, in which case
/// all `tweets.js` / `tweets-part<N>.js` files are parsed and concatenated in
/// part order.
pub fn load_archive(path: &Path) -> Result<Vec<RawPost>> {
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        find_archive_files(path)
    };

    if files.is_empty() {
        return Err(SenseError::NoArchiveFiles(path.to_path_buf()));
    }

    let mut posts = Vec::new();
    for file in &files {
        let content = std::fs::read_to_string(file).map_err(|source| SenseError::FileRead {
            path: file.clone(),
            source,
        })?;
        let parsed = parse_archive(&content)?;
        debug!("File {}: {} raw posts", file.display(), parsed.len());
        posts.extend(parsed);
    }

    info!(
        "Loaded {} raw posts from {} archive file(s)",
        posts.len(),
        files.len()
    );
    Ok(posts)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Locate the object describing one post within an array element.
///
/// Elements normally wrap the post in a single key (`{"tweet": {...}}`);
/// an element that already looks like a post is used directly.
fn post_object(element: &Value) -> Option<&Map<String, Value>> {
    let obj = element.as_object()?;
    if let Some(Value::Object(inner)) = obj.get("tweet") {
        return Some(inner);
    }
    if obj.len() == 1 {
        if let Some(Value::Object(inner)) = obj.values().next() {
            return Some(inner);
        }
    }
    Some(obj)
}

fn extract_raw_post(element: &Value) -> RawPost {
    let Some(obj) = post_object(element) else {
        warn!("Skipping non-object archive element");
        return RawPost::default();
    };

    let id = obj
        .get("id")
        .and_then(scalar_to_string)
        .or_else(|| obj.get("id_str").and_then(scalar_to_string));

    let created_at = obj.get("created_at").and_then(scalar_to_string);

    let text = obj
        .get("full_text")
        .and_then(Value::as_str)
        .or_else(|| obj.get("text").and_then(Value::as_str))
        .map(str::to_string);

    RawPost {
        id,
        created_at,
        text,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn excerpt(s: &str) -> String {
    let trimmed = s.trim();
    let mut out: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    if trimmed.chars().count() > EXCERPT_CHARS {
        out.push('…');
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
