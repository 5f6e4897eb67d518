//! Input validation for the ingestion and notebook boundaries.
//!
//! All checks here run before any side effect, so a rejected input never
//! creates partial state. Layers for uploads:
//! 1. MIME whitelist (exactly `application/pdf` and `text/plain`)
//! 2. Size cap
//! 3. File name sanitization and length bounds
//! 4. Magic byte mismatch guard

use crate::defaults::{
    DEFAULT_EMOJI, MAX_EMOJI_CHARS, MAX_NOTEBOOK_TITLE_CHARS, MAX_SOURCE_TITLE_CHARS,
    MAX_UPLOAD_SIZE_BYTES,
};
use crate::error::{Error, Result};
use crate::models::SourceKind;

/// Validate a notebook title: non-empty after trimming, bounded length.
pub fn validate_notebook_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("Title is required".to_string()));
    }
    if title.chars().count() > MAX_NOTEBOOK_TITLE_CHARS {
        return Err(Error::InvalidInput(format!(
            "Title is too long (max {} characters)",
            MAX_NOTEBOOK_TITLE_CHARS
        )));
    }
    Ok(title.to_string())
}

/// Validate a notebook emoji, falling back to the default glyph.
///
/// A single emoji glyph can span several Unicode scalars (variation
/// selectors, skin-tone modifiers), so the check is a scalar-count bound
/// plus an ASCII rejection rather than a full emoji table.
pub fn validate_emoji(emoji: Option<&str>) -> Result<String> {
    let emoji = match emoji.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_EMOJI.to_string()),
        Some(e) => e,
    };
    if emoji.chars().count() > MAX_EMOJI_CHARS || emoji.chars().any(|c| c.is_ascii()) {
        return Err(Error::InvalidInput(
            "Emoji must be a single emoji glyph".to_string(),
        ));
    }
    Ok(emoji.to_string())
}

/// Sanitize a file name for safe storage as a source title.
pub fn sanitize_filename(filename: &str) -> String {
    // Remove path components
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    // Replace dangerous characters
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "unnamed_file".to_string();
    }

    // Truncate if too long (preserve extension)
    if sanitized.len() > MAX_SOURCE_TITLE_CHARS {
        if let Some(dot_pos) = sanitized.rfind('.') {
            let ext = &sanitized[dot_pos..];
            if ext.len() < MAX_SOURCE_TITLE_CHARS {
                let name = truncate_on_boundary(sanitized, MAX_SOURCE_TITLE_CHARS - ext.len());
                return format!("{}{}", name, ext);
            }
        }
        return truncate_on_boundary(sanitized, MAX_SOURCE_TITLE_CHARS).to_string();
    }

    sanitized.to_string()
}

/// Cut a string at most `max` bytes long, backing off to a char boundary.
fn truncate_on_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    &s[..cut]
}

/// Validate an upload, returning the sanitized title and canonical kind.
///
/// Fail-fast: the caller must not have created any state before this runs.
pub fn validate_upload(file_name: &str, mime_type: &str, data: &[u8]) -> Result<(String, SourceKind)> {
    let kind = SourceKind::from_mime(mime_type)
        .ok_or_else(|| Error::UnsupportedType(mime_type.to_string()))?;

    if data.is_empty() {
        return Err(Error::InvalidInput("File is empty".to_string()));
    }
    if data.len() > MAX_UPLOAD_SIZE_BYTES {
        return Err(Error::PayloadTooLarge {
            size: data.len(),
            max: MAX_UPLOAD_SIZE_BYTES,
        });
    }

    // Magic byte mismatch guard: a claimed type whose bytes are recognizably
    // a different format is rejected rather than forwarded to the agent.
    // Plain text has no magic bytes, so `None` passes through.
    if let Some(detected) = infer::get(data) {
        if detected.mime_type() != kind.as_mime() {
            return Err(Error::InvalidInput(format!(
                "File content does not match declared type {} (detected {})",
                mime_type,
                detected.mime_type()
            )));
        }
    }

    let title = sanitize_filename(file_name);
    debug_assert!(title.chars().count() <= MAX_SOURCE_TITLE_CHARS);

    Ok((title, kind))
}
