#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Helpers for in-document `$ref` pointers.
//!
//! External documents are never fetched. An absolute or relative reference is
//! treated as local only when its document part matches the current document's
//! `$self` URI.

use percent_encoding::percent_decode_str;
use std::path::Path;
use url::Url;

/// Splits a reference into its document part and fragment.
fn split_reference(ref_str: &str) -> (&str, Option<&str>) {
    match ref_str.split_once('#') {
        Some((doc, frag)) => (doc, Some(frag)),
        None => (ref_str, None),
    }
}

/// Normalizes a `$ref` to a local JSON Pointer (e.g. `#/components/...`) if it
/// targets the current document as identified by `$self`.
///
/// Returns `None` if the reference is external or lacks a fragment.
pub(crate) fn normalize_ref_to_local(ref_str: &str, self_uri: Option<&str>) -> Option<String> {
    let (document, fragment) = split_reference(ref_str);
    let fragment = fragment?;
    if document.is_empty() {
        return Some(format!("#{}", fragment));
    }
    if ref_doc_matches_self(document, self_uri?) {
        return Some(format!("#{}", fragment));
    }
    None
}

/// Extracts a component name from a `$ref` if it points to `#/components/{section}/{name}`.
///
/// Returns `None` if the reference is not local to the current document.
pub(crate) fn extract_component_name(
    ref_str: &str,
    self_uri: Option<&str>,
    section: &str,
) -> Option<String> {
    let local = normalize_ref_to_local(ref_str, self_uri)?;
    let pointer = local.trim_start_matches('#').trim_start_matches('/');
    let segments: Vec<&str> = pointer.split('/').collect();

    if segments.len() != 3 {
        return None;
    }
    if segments[0] != "components" || segments[1] != section {
        return None;
    }

    let name = decode_pointer_segment(segments[2]);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-encoding).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded.replace("~1", "/").replace("~0", "~")
}

/// Encodes a JSON Pointer segment (`~` -> `~0`, `/` -> `~1`).
pub(crate) fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Appends an encoded segment to a JSON pointer.
pub(crate) fn pointer_child(base: &str, segment: &str) -> String {
    format!("{}/{}", base, encode_pointer_segment(segment))
}

/// Canonical local pointer of a component schema.
pub(crate) fn schema_pointer(name: &str) -> String {
    pointer_child("#/components/schemas", name)
}

fn ref_doc_matches_self(ref_doc: &str, self_uri: &str) -> bool {
    if ref_doc == self_uri {
        return true;
    }

    if let (Ok(ref_url), Ok(self_url)) = (Url::parse(ref_doc), Url::parse(self_uri)) {
        return ref_url.scheme() == self_url.scheme()
            && ref_url.host() == self_url.host()
            && ref_url.port() == self_url.port()
            && ref_url.path() == self_url.path();
    }

    // `$self` given as an absolute path (e.g. "/api/openapi").
    if self_uri.starts_with('/') {
        if let Ok(ref_url) = Url::parse(ref_doc) {
            return ref_url.path() == self_uri;
        }
    }

    if !self_uri.contains("://") && !ref_doc.contains("://") {
        return Path::new(ref_doc) == Path::new(self_uri);
    }

    false
}
