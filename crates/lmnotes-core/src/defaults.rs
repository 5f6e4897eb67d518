//! Centralized default constants for the LMNotes system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates should reference these constants instead of defining
//! their own magic numbers.

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_UPLOAD_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Request body cap applied by the HTTP server. Slightly above the file
/// limit so multipart framing overhead does not reject a file that core
/// validation would accept (and report as `PayloadTooLarge`).
pub const REQUEST_BODY_LIMIT_BYTES: usize = MAX_UPLOAD_SIZE_BYTES + 1024 * 1024;

// =============================================================================
// VALIDATION BOUNDS
// =============================================================================

/// Maximum notebook title length in characters.
pub const MAX_NOTEBOOK_TITLE_CHARS: usize = 100;

/// Maximum source title (file name) length in characters.
pub const MAX_SOURCE_TITLE_CHARS: usize = 255;

/// Maximum Unicode scalar values accepted for a notebook emoji. A single
/// glyph can span several scalars (variation selectors, skin-tone
/// modifiers).
pub const MAX_EMOJI_CHARS: usize = 4;

/// Fallback notebook emoji.
pub const DEFAULT_EMOJI: &str = "📝";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

// =============================================================================
// AGENT CLIENT
// =============================================================================

/// Timeout for agent upload requests (seconds). Uploads carry file bytes
/// and trigger indexing, so they get the longest budget.
pub const AGENT_UPLOAD_TIMEOUT_SECS: u64 = 120;

/// Timeout for agent chat requests (seconds).
pub const AGENT_CHAT_TIMEOUT_SECS: u64 = 300;

/// Timeout for other agent requests (seconds).
pub const AGENT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// ENVIRONMENT VARIABLE NAMES
// =============================================================================

/// Database connection URL (required at startup).
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Agent service base URL (required at startup).
pub const ENV_AGENT_BASE_URL: &str = "AGENT_BASE_URL";

/// Optional server bind host override.
pub const ENV_HOST: &str = "HOST";

/// Optional server port override.
pub const ENV_PORT: &str = "PORT";
