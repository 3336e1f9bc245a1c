//! Multi-round deliberation rules
//!
//! The orchestration of deliberation rounds lives in the application layer;
//! this module holds the pure convergence rule it consults between rounds.

use crate::experiment::Response;
use std::collections::HashMap;

/// Have responses stopped changing between rounds?
///
/// Compares each model's current response text against its previous one.
/// Converged means every model that answered in both rounds returned exactly
/// the same content. Returns `false` when either round is empty or no model
/// appears in both.
pub fn check_convergence(current: &[Response], previous: &[Response]) -> bool {
    if current.is_empty() || previous.is_empty() {
        return false;
    }

    let prev_by_model: HashMap<&str, &Response> =
        previous.iter().map(|r| (r.model.as_str(), r)).collect();

    let mut compared = 0;
    for response in current {
        if let Some(prev) = prev_by_model.get(response.model.as_str()) {
            if prev.content != response.content {
                return false;
            }
            compared += 1;
        }
    }

    compared > 0
}
