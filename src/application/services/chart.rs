//! Org chart service
//!
//! Loads leader lists, assembles charts, and renders them. The last assembled
//! chart is memoized by input fingerprint, so re-rendering unchanged data
//! skips assembly.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, instrument};

use crate::application::hash::leaders_fingerprint;
use crate::application::loader::LeaderLoader;
use crate::application::render::{render, OutputFormat, RenderOptions};
use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{ChartBuilder, ChartStats, Leader, OrgChart, TierRules};
use crate::infrastructure::traits::FileSystem;

/// Service for assembling and rendering org charts.
pub struct ChartService {
    fs: Arc<dyn FileSystem>,
    loader: LeaderLoader,
    builder: ChartBuilder,
    memo: Mutex<Option<(String, Arc<OrgChart>)>>,
    assemblies: AtomicUsize,
}

impl ChartService {
    pub fn new(fs: Arc<dyn FileSystem>, rules: TierRules) -> Self {
        Self {
            loader: LeaderLoader::new(fs.clone()),
            fs,
            builder: ChartBuilder::with_rules(rules),
            memo: Mutex::new(None),
            assemblies: AtomicUsize::new(0),
        }
    }

    pub fn rules(&self) -> &TierRules {
        self.builder.rules()
    }

    /// Chart for `leaders`, reusing the previous result when the input is unchanged.
    #[instrument(level = "debug", skip_all, fields(count = leaders.len()))]
    pub fn chart(&self, leaders: &[Leader]) -> ApplicationResult<Arc<OrgChart>> {
        let fingerprint = leaders_fingerprint(leaders)?;
        let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((cached, chart)) = memo.as_ref() {
            if *cached == fingerprint {
                debug!(fingerprint = %&fingerprint[..8], "chart memo hit");
                return Ok(chart.clone());
            }
        }

        let chart = Arc::new(self.builder.assemble(leaders)?);
        self.assemblies.fetch_add(1, Ordering::Relaxed);
        info!(nodes = chart.len(), roots = chart.roots().len(), "assembled chart");
        *memo = Some((fingerprint, chart.clone()));
        Ok(chart)
    }

    /// Number of times a chart was actually assembled (memo misses).
    pub fn assemblies(&self) -> usize {
        self.assemblies.load(Ordering::Relaxed)
    }

    pub fn clear_cache(&self) {
        *self.memo.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn load_chart(&self, source: &Path) -> ApplicationResult<Arc<OrgChart>> {
        let leaders = self.loader.load(source)?;
        self.chart(&leaders)
    }

    pub fn render_source(
        &self,
        source: &Path,
        format: OutputFormat,
        options: &RenderOptions,
    ) -> ApplicationResult<String> {
        let chart = self.load_chart(source)?;
        render(&chart, format, options)
    }

    pub fn stats(&self, source: &Path) -> ApplicationResult<ChartStats> {
        let chart = self.load_chart(source)?;
        Ok(ChartStats::from_chart(&chart))
    }

    /// Write rendered output, creating parent directories as needed.
    #[instrument(level = "debug", skip(self, content))]
    pub fn write_output(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create output directory", path)?;
        self.fs
            .write(path, content)
            .with_path_context("write chart", path)?;
        Ok(())
    }
}
