//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Tier;

/// Domain errors represent violations of chart invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unknown chart node: {0}")]
    UnknownNode(String),

    #[error("cannot attach tier {child} node below tier {parent} node")]
    TierOrder { child: Tier, parent: Tier },

    #[error("invalid {tier} keyword set: {message}")]
    InvalidKeyword { tier: &'static str, message: String },
}
