//! Chart rendering back-ends

mod html;
mod json;
mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::application::ApplicationResult;
use crate::domain::OrgChart;

pub use html::render_html;
pub use json::render_json;
pub use text::render_text;

pub const DEFAULT_EMPTY_MESSAGE: &str = "No leadership data to display.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Presentation switches shared by all back-ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Shown instead of a chart when there are no leaders
    pub empty_message: String,
    pub show_avatars: bool,
    /// HTML only: wrap the fragment in a full document with styles
    pub standalone: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            show_avatars: true,
            standalone: false,
        }
    }
}

pub fn render(
    chart: &OrgChart,
    format: OutputFormat,
    options: &RenderOptions,
) -> ApplicationResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(chart, options)),
        OutputFormat::Html => Ok(render_html(chart, options)),
        OutputFormat::Json => render_json(chart),
    }
}
