//! Canonical document locations
//!
//! Every loaded document is identified by an absolute `file://` URL (or the
//! `http(s)://` URL it was given as). Paths are made absolute, dot segments
//! removed, symlinks resolved when the file exists, separators unified, and
//! each segment percent-encoded the same way, so two spellings of one file
//! always map to one named graph.

use crate::error::{InspectError, InspectResult};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path, PathBuf};
use tabcube_graph_ir::iri::{self, IriParts};

/// Characters escaped inside a path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Normalize a user-supplied path, `file:` URL or `http(s)` URL
pub fn canonical_location(input: &str) -> InspectResult<String> {
    if is_remote(input) {
        let parts = IriParts::parse(input);
        let path = iri::remove_dot_segments(parts.path);
        return Ok(IriParts { path: &path, ..parts }.to_string());
    }

    let path = match to_path(input) {
        Some(path) => path,
        None => PathBuf::from(input),
    };
    let absolute = if path.is_absolute() || has_drive(&path.to_string_lossy()) {
        path
    } else {
        std::env::current_dir()
            .map_err(|source| InspectError::UnreadableDocument {
                location: input.to_string(),
                source,
            })?
            .join(path)
    };
    let resolved = match std::fs::canonicalize(&absolute) {
        Ok(real) => real,
        Err(_) => normalize_lexically(&absolute),
    };
    Ok(path_to_file_url(&resolved))
}

pub fn is_remote(location: &str) -> bool {
    matches!(iri::scheme_of(location), Some("http" | "https"))
}

/// `C:`, `C:/...` or `C:\...`
fn has_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/' || bytes[2] == b'\\')
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn path_to_file_url(path: &Path) -> String {
    let raw = path.to_string_lossy();
    // Strip the verbatim prefix Windows canonicalization adds
    let raw = raw.strip_prefix(r"\\?\").unwrap_or(&*raw).replace('\\', "/");

    let encoded: Vec<String> = raw
        .split('/')
        .map(|segment| {
            if has_drive(segment) {
                segment.to_string()
            } else {
                utf8_percent_encode(segment, SEGMENT).to_string()
            }
        })
        .collect();
    let joined = encoded.join("/");
    if joined.starts_with('/') {
        format!("file://{joined}")
    } else {
        format!("file:///{joined}")
    }
}

/// Local path of a `file:` location, without query or fragment
pub fn to_path(location: &str) -> Option<PathBuf> {
    if iri::scheme_of(location) != Some("file") {
        return None;
    }
    let parts = IriParts::parse(location);
    let decoded = percent_decode_str(parts.path).decode_utf8_lossy().into_owned();
    // `/C:/data` is a drive path
    if decoded.strip_prefix('/').is_some_and(has_drive) {
        return Some(PathBuf::from(&decoded[1..]));
    }
    Some(PathBuf::from(decoded))
}

fn drive_of<'a>(segments: &[&'a str]) -> Option<&'a str> {
    segments
        .iter()
        .copied()
        .find(|s| !s.is_empty())
        .filter(|s| has_drive(s))
}

/// Render `target` relative to the directory of `document`
///
/// Falls back to `target` unchanged when no relative form exists: a
/// different scheme or host, or a different drive.
pub fn relative_reference(document: &str, target: &str) -> String {
    let doc = IriParts::parse(document);
    let tgt = IriParts::parse(target);
    if doc.scheme != tgt.scheme || doc.authority != tgt.authority || doc.scheme.is_none() {
        return target.to_string();
    }

    let doc_segments: Vec<&str> = doc.path.split('/').collect();
    let tgt_segments: Vec<&str> = tgt.path.split('/').collect();
    let doc_dir = &doc_segments[..doc_segments.len() - 1];
    let (tgt_file, tgt_dir) = match tgt_segments.split_last() {
        Some((file, dir)) => (*file, dir),
        None => return target.to_string(),
    };

    if drive_of(doc_dir) != drive_of(tgt_dir) {
        return target.to_string();
    }

    let common = doc_dir
        .iter()
        .zip(tgt_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = "../".repeat(doc_dir.len() - common);
    for segment in &tgt_dir[common..] {
        relative.push_str(segment);
        relative.push('/');
    }
    relative.push_str(tgt_file);

    if let Some(query) = tgt.query {
        relative.push('?');
        relative.push_str(query);
    }
    if let Some(fragment) = tgt.fragment {
        relative.push('#');
        relative.push_str(fragment);
    }
    relative
}
