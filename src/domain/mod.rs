//! Domain layer: entities and chart logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod stats;
pub mod tier;

pub use arena::{ChartNode, OrgChart};
pub use builder::{ChartBuilder, ChartResult};
pub use entities::*;
pub use error::DomainError;
pub use stats::ChartStats;
pub use tier::{classify_tier, TierRules};
