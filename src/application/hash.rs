//! Content fingerprints for chart memoization

use sha2::{Digest, Sha256};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Leader;

/// Compute full-length lowercase hex SHA-256 of content.
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Fingerprint of a leader list: hash of its canonical JSON serialization.
///
/// Field order is fixed by the struct, so equal lists always hash equally
/// regardless of how the source JSON was formatted.
pub fn leaders_fingerprint(leaders: &[Leader]) -> ApplicationResult<String> {
    let bytes = serde_json::to_vec(leaders).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize leaders for fingerprint".to_string(),
        source: Box::new(e),
    })?;
    Ok(content_hash(&bytes))
}
