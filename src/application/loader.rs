//! Leader list loading
//!
//! Accepts the row array exported from the `leaders` table, or the
//! `{"data": [...]}` envelope the BaaS REST endpoint returns.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::application::error_ext::missing_input;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Leader;
use crate::infrastructure::traits::FileSystem;

/// Path argument meaning "read from stdin".
pub const STDIN_MARKER: &str = "-";

#[derive(Deserialize)]
struct Envelope {
    data: Vec<Leader>,
}

/// Parse leader JSON. Blank input is an empty list.
///
/// `origin` names the source in error messages.
pub fn parse_leaders(content: &str, origin: &str) -> ApplicationResult<Vec<Leader>> {
    let trimmed = content.trim_start();
    let leaders = match trimmed.chars().next() {
        None => Vec::new(),
        Some('[') => serde_json::from_str::<Vec<Leader>>(content)
            .map_err(|e| invalid_input(origin, &e))?,
        Some('{') => {
            serde_json::from_str::<Envelope>(content)
                .map_err(|e| invalid_input(origin, &e))?
                .data
        }
        Some(_) => {
            return Err(ApplicationError::InvalidInput {
                origin: origin.to_string(),
                line: 1,
                column: 1,
                message: "expected a JSON array of leaders or an object with a `data` array"
                    .to_string(),
            })
        }
    };

    let mut seen = HashSet::new();
    for leader in &leaders {
        if !seen.insert(leader.id.as_str()) {
            warn!(id = %leader.id, origin, "duplicate leader id");
        }
    }
    debug!(count = leaders.len(), origin, "parsed leaders");
    Ok(leaders)
}

fn invalid_input(origin: &str, e: &serde_json::Error) -> ApplicationError {
    ApplicationError::InvalidInput {
        origin: origin.to_string(),
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    }
}

/// Reads leader lists from files or stdin.
pub struct LeaderLoader {
    fs: Arc<dyn FileSystem>,
}

impl LeaderLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Leader>> {
        if path.as_os_str() == STDIN_MARKER {
            return self.load_stdin();
        }
        if !self.fs.exists(path) {
            return Err(missing_input(path));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read leaders", path)?;
        parse_leaders(&content, &path.display().to_string())
    }

    fn load_stdin(&self) -> ApplicationResult<Vec<Leader>> {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .with_path_context("read leaders", Path::new("<stdin>"))?;
        parse_leaders(&content, "<stdin>")
    }
}
