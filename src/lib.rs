//! Leadership org-chart layout.
//!
//! Classifies leader records into tiers by keyword-matching their position
//! titles, links each record under the nearest department-matching leader one
//! tier above, and renders the resulting forest as text, HTML or JSON.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::render::{render, OutputFormat, RenderOptions};
pub use application::services::ChartService;
pub use domain::{
    classify_tier, ChartBuilder, ChartStats, HierarchyNode, Leader, OrgChart, Tier, TierRules,
};
