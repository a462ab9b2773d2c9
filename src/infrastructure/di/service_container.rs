//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::render::RenderOptions;
use crate::application::services::ChartService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub chart_service: ChartService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container over a custom filesystem (for testing).
    ///
    /// All chart reads and writes go through `fs`. Fails when the configured
    /// tier keywords cannot be compiled.
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> InfraResult<Self> {
        let rules = settings.tiers.to_rules()?;
        Ok(Self {
            settings: Arc::new(settings),
            chart_service: ChartService::new(fs, rules),
        })
    }

    /// Render options from settings; CLI flags may override individual fields.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            empty_message: self.settings.render.empty_message.clone(),
            show_avatars: self.settings.render.show_avatars,
            standalone: false,
        }
    }
}
