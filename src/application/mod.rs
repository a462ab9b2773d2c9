//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod hash;
pub mod loader;
pub mod render;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use loader::{parse_leaders, LeaderLoader, STDIN_MARKER};
pub use render::{render, OutputFormat, RenderOptions};
