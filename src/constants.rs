//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers and fixed keys to make them discoverable.

/// Base URL of the Gemini generateContent endpoint. The model segment is
/// substituted from config; the API key is appended as a query parameter.
pub const GENERATION_ENDPOINT_BASE: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";

/// User-Agent header sent with every generation request.
pub const USER_AGENT: &str = "cmail/1.0";

/// Registry key for the saved-email collection.
pub const SAVED_EMAILS_KEY: &str = "SavedEmails";

/// Registry key for the writing-style collection.
pub const WRITING_STYLES_KEY: &str = "WritingStyles";

/// Registry key for the draft collection.
pub const DRAFTS_KEY: &str = "Drafts";

/// Maximum number of writing styles the command layer will accept.
/// The store itself imposes no cap.
pub const MAX_WRITING_STYLES: usize = 30;

/// File name of the key-value registry inside the data directory.
pub const REGISTRY_FILE: &str = "records.json";

/// Timestamp format used for defaulted record titles, e.g. "Feb 03, 2026 14:05".
pub const TITLE_DATE_FORMAT: &str = "%b %d, %Y %H:%M";
