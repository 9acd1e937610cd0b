//! Record persistence: a key-value settings registry plus one CRUD store
//! per record collection.
//!
//! Stores are constructed once at startup and passed by reference to
//! whatever needs them; the registry file is the only shared resource and
//! each store writes only its own key.

mod records;
mod registry;

pub use records::{InsertPosition, Record, RecordStore, drafts, saved_emails, writing_styles};
pub use registry::Registry;
