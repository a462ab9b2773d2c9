//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgchart/orgchart.toml`
//! 3. Local config: `<project_dir>/.orgchart.toml`
//! 4. Environment variables: `ORGCHART_*` prefix

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::render::{OutputFormat, DEFAULT_EMPTY_MESSAGE};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::tier::{BOARD_KEYWORDS, DIRECTOR_KEYWORDS, MANAGER_KEYWORDS};
use crate::domain::TierRules;

/// Keyword sets for tier classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TierKeywords {
    pub board: Vec<String>,
    pub director: Vec<String>,
    pub manager: Vec<String>,
}

impl Default for TierKeywords {
    fn default() -> Self {
        let owned =
            |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            board: owned(&BOARD_KEYWORDS),
            director: owned(&DIRECTOR_KEYWORDS),
            manager: owned(&MANAGER_KEYWORDS),
        }
    }
}

/// Raw keyword config for intermediate parsing (arrays are Option to detect "not specified").
///
/// Used during layered config merging to distinguish between:
/// - `None` → field not specified, inherit from base
/// - `Some([])` → explicit empty array
/// - `Some([...])` → explicit values to merge
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTierKeywords {
    pub board: Option<Vec<String>>,
    pub director: Option<Vec<String>>,
    pub manager: Option<Vec<String>>,
}

impl TierKeywords {
    /// Merge arrays with union semantics and negation support.
    ///
    /// - Items from overlay are added to base
    /// - Items prefixed with `!` remove the corresponding item from the result
    /// - Duplicates are de-duplicated
    ///
    /// # Examples
    /// ```ignore
    /// merge_array(&["a", "b"], &["c"])       // → ["a", "b", "c"]
    /// merge_array(&["a", "b"], &["!a", "c"]) // → ["b", "c"]
    /// ```
    pub fn merge_array(base: &[String], overlay: &[String]) -> Vec<String> {
        let mut result: HashSet<String> = base.iter().cloned().collect();

        for keyword in overlay {
            if let Some(negated) = keyword.strip_prefix('!') {
                result.remove(negated);
            } else {
                result.insert(keyword.clone());
            }
        }

        // Sorted for deterministic output; matching is order-independent within a tier
        let mut vec: Vec<String> = result.into_iter().collect();
        vec.sort();
        vec
    }

    /// Union-merge overlay keywords onto self.
    pub fn merge(&self, overlay: &RawTierKeywords) -> Self {
        let merge = |base: &Vec<String>, over: &Option<Vec<String>>| {
            over.as_ref()
                .map(|o| Self::merge_array(base, o))
                .unwrap_or_else(|| base.clone())
        };
        Self {
            board: merge(&self.board, &overlay.board),
            director: merge(&self.director, &overlay.director),
            manager: merge(&self.manager, &overlay.manager),
        }
    }

    /// Apply global config onto defaults; specified arrays REPLACE the defaults.
    pub fn apply_global(&self, global: &RawTierKeywords) -> Self {
        Self {
            board: global.board.clone().unwrap_or_else(|| self.board.clone()),
            director: global
                .director
                .clone()
                .unwrap_or_else(|| self.director.clone()),
            manager: global
                .manager
                .clone()
                .unwrap_or_else(|| self.manager.clone()),
        }
    }

    pub fn to_rules(&self) -> ApplicationResult<TierRules> {
        Ok(TierRules::from_keywords(
            self.board.as_slice(),
            self.director.as_slice(),
            self.manager.as_slice(),
        )?)
    }
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Placeholder shown when there are no leaders
    pub empty_message: String,
    pub show_avatars: bool,
    /// Default output format for `render`
    pub format: OutputFormat,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            show_avatars: true,
            format: OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub empty_message: Option<String>,
    pub show_avatars: Option<bool>,
    pub format: Option<OutputFormat>,
}

impl RenderConfig {
    fn merge(&self, overlay: &RawRenderConfig) -> Self {
        Self {
            empty_message: overlay
                .empty_message
                .clone()
                .unwrap_or_else(|| self.empty_message.clone()),
            show_avatars: overlay.show_avatars.unwrap_or(self.show_avatars),
            format: overlay.format.unwrap_or(self.format),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub render: RawRenderConfig,
    pub tiers: RawTierKeywords,
}

/// Unified configuration for orgchart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Leader list used when no input file is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    pub render: RenderConfig,
    pub tiers: TierKeywords,
}

/// Get the XDG config directory for orgchart.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgchart").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgchart.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".orgchart.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(data_file) = &self.data_file {
            let expanded = expand_env_vars(data_file.to_string_lossy().as_ref());
            self.data_file = Some(PathBuf::from(expanded));
        }
    }

    /// Merge overlay config onto self (base) with union semantics for keyword arrays.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay.data_file.clone().or_else(|| self.data_file.clone()),
            render: self.render.merge(&overlay.render),
            tiers: self.tiers.merge(&overlay.tiers),
        }
    }

    /// Apply global config onto defaults with REPLACE semantics for keyword arrays.
    fn apply_global(&self, global: &RawSettings) -> Self {
        Self {
            data_file: global.data_file.clone().or_else(|| self.data_file.clone()),
            render: self.render.merge(&global.render),
            tiers: self.tiers.apply_global(&global.tiers),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.orgchart.toml`
    ///
    /// # Array Merge Semantics
    /// - Defaults → Global: REPLACE (global defines the real baseline)
    /// - Global → Local: UNION with negation support
    /// - Any → Env vars: REPLACE (explicit user override)
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), project_dir)
    }

    /// Layered load with an explicit global config file (`None` skips that layer).
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        Self::load_layers(global_path, project_dir, None)
    }

    /// Layered load reading `ORGCHART_*` overrides from `vars` instead of the process environment.
    pub fn load_from_vars(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
        vars: Map<String, String>,
    ) -> Result<Self, ApplicationError> {
        Self::load_layers(global_path, project_dir, Some(vars))
    }

    fn load_layers(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config (REPLACES defaults)
        if let Some(global_path) = global_path {
            let raw = load_raw_settings(global_path)?;
            current = current.apply_global(&raw);
        }

        // 3. Local config (UNION with global)
        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (replace)
        current = Self::apply_env_overrides(current, vars)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply ORGCHART_* environment variables as explicit overrides.
    ///
    /// `vars` replaces the process environment when given.
    fn apply_env_overrides(
        mut settings: Self,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("ORGCHART")
                .source(vars)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("tiers.board")
                .with_list_parse_key("tiers.director")
                .with_list_parse_key("tiers.manager")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("render.empty_message") {
            settings.render.empty_message = val;
        }
        if let Ok(val) = config.get_bool("render.show_avatars") {
            settings.render.show_avatars = val;
        }
        if let Ok(val) = config.get_string("render.format") {
            settings.render.format = val
                .parse()
                .map_err(|message| ApplicationError::Config { message })?;
        }
        if let Ok(val) = config.get::<Vec<String>>("tiers.board") {
            settings.tiers.board = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("tiers.director") {
            settings.tiers.director = val;
        }
        if let Ok(val) = config.get::<Vec<String>>("tiers.manager") {
            settings.tiers.manager = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgchart configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgchart/orgchart.toml  (defines your baseline)
#   Local:  <project_dir>/.orgchart.toml      (project-specific additions)
#   Env:    ORGCHART_* environment variables  (explicit overrides)
#
# Keyword Merge Semantics:
#   Global config REPLACES compiled defaults.
#   Local config UNIONS with global.
#   Use "!keyword" in local config to REMOVE an inherited keyword:
#     director = ["lead", "!vice"]  # adds lead, removes vice

# Leader list used when no file argument is given
# data_file = "~/association/leaders.json"

[render]
# Shown when the leader list is empty
# empty_message = "No leadership data to display."

# Draw avatars from image_url (HTML only)
# show_avatars = true

# Default output format: text, html or json
# format = "text"

[tiers]
# Case-insensitive substrings; first matching tier wins (board, then director, then manager)
# board = ["board", "president", "chair", "executive", "ceo"]
# director = ["director", "vice", "coordinator", "head", "chief"]
# manager = ["manager", "officer", "secretary", "treasurer", "minister"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
