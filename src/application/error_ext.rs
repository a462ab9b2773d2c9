//! I/O error context for leader files and rendered output
//!
//! Every filesystem failure surfaces as `OperationFailed` naming the action and
//! path, with the `io::Error` kept as source so the CLI can pick an exit code.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

pub trait IoResultExt<T> {
    /// e.g. `fs.write(path, html).with_path_context("write chart", path)?`
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{action}: {}", path.display()),
            source: Box::new(e),
        })
    }
}

/// Leader file that does not exist; maps to the "no input" exit code.
pub fn missing_input(path: &Path) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: format!("leader file not found: {}", path.display()),
        source: Box::new(io::Error::new(io::ErrorKind::NotFound, "file does not exist")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_io_failure_when_adding_context_then_names_action_and_path() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));

        let err = result
            .with_path_context("write chart", Path::new("out/chart.html"))
            .unwrap_err();

        assert_eq!(err.to_string(), "operation failed: write chart: out/chart.html");
    }

    #[test]
    fn given_missing_path_when_building_error_then_keeps_not_found_source() {
        match missing_input(Path::new("leaders.json")) {
            ApplicationError::OperationFailed { context, source } => {
                assert!(context.contains("leaders.json"));
                let io_err = source.downcast_ref::<io::Error>().expect("io source");
                assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
