//! Shared utility functions.

use uuid::Uuid;

/// Generate a short unique identifier (first 8 hex chars of a v4 UUID).
///
/// Used for experiment, question, response, and ranking ids. Short ids keep
/// CLI output and JSON files readable; collisions within one experiment are
/// astronomically unlikely at the scale involved.
pub fn short_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
