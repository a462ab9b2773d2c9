//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Local: UNION with negation support
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! These tests pass explicit global files via `load_from`, so the user's
//! real XDG config never leaks in. Env overrides go through `load_from_vars`
//! so the process environment is never touched.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use orgchart::application::{ApplicationError, OutputFormat};
use orgchart::config::{local_config_path, Settings, TierKeywords};
use orgchart::domain::Tier;
use orgchart::infrastructure::di::ServiceContainer;

fn write_local(dir: &TempDir, content: &str) {
    fs::write(local_config_path(dir.path()), content).unwrap();
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn write_global(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("orgchart.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_no_config_files_when_loading_then_uses_defaults() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load_from(None, Some(project.path())).expect("load settings");

    assert_eq!(settings.tiers, TierKeywords::default());
    assert!(settings.render.show_avatars);
    assert_eq!(settings.render.format, OutputFormat::Text);
    assert!(settings.data_file.is_none());
}

#[test]
fn given_local_keywords_when_loading_then_unions_with_defaults() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
[tiers]
director = ["lead"]
"#,
    );

    let settings = Settings::load_from(None, Some(project.path())).unwrap();

    assert!(settings.tiers.director.contains(&"lead".to_string()));
    assert!(settings.tiers.director.contains(&"vice".to_string()));
    assert_eq!(settings.tiers.director.len(), 6);
    assert_eq!(settings.tiers.board, TierKeywords::default().board);
}

#[test]
fn given_local_negation_when_loading_then_removes_keyword() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
[tiers]
director = ["!vice"]
"#,
    );

    let settings = Settings::load_from(None, Some(project.path())).unwrap();
    let rules = settings.tiers.to_rules().unwrap();

    assert!(!settings.tiers.director.contains(&"vice".to_string()));
    assert_eq!(rules.classify(Some("Vice Captain")), Tier::Member);
}

#[test]
fn given_global_keywords_when_loading_then_replaces_defaults() {
    let global_dir = TempDir::new().unwrap();
    let global = write_global(
        &global_dir,
        r#"
[tiers]
board = ["founder"]
"#,
    );

    let settings = Settings::load_from(Some(&global), None).unwrap();

    assert_eq!(settings.tiers.board, vec!["founder".to_string()]);
    assert_eq!(settings.tiers.manager, TierKeywords::default().manager);
}

#[test]
fn given_global_and_local_when_loading_then_local_unions_with_global() {
    let global_dir = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let global = write_global(
        &global_dir,
        r#"
[tiers]
board = ["founder"]

[render]
empty_message = "Global message"
format = "html"
"#,
    );
    write_local(
        &project,
        r#"
[tiers]
board = ["patron"]

[render]
show_avatars = false
"#,
    );

    let settings = Settings::load_from(Some(&global), Some(project.path())).unwrap();

    assert_eq!(
        settings.tiers.board,
        vec!["founder".to_string(), "patron".to_string()]
    );
    assert_eq!(settings.render.empty_message, "Global message");
    assert_eq!(settings.render.format, OutputFormat::Html);
    assert!(!settings.render.show_avatars);
}

#[test]
fn given_data_file_with_tilde_when_loading_then_expanded() {
    let project = TempDir::new().unwrap();
    write_local(&project, "data_file = \"~/leaders.json\"\n");

    let settings = Settings::load_from(None, Some(project.path())).unwrap();

    let home = std::env::var("HOME").expect("HOME should be set");
    let data_file = settings.data_file.expect("data_file set");
    assert!(data_file.starts_with(&home));
    assert!(data_file.ends_with("leaders.json"));
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    let project = TempDir::new().unwrap();
    write_local(&project, "[tiers\nboard = ");

    let err = Settings::load_from(None, Some(project.path())).unwrap_err();

    assert!(err.to_string().contains("config error"), "{err}");
}

#[test]
fn given_settings_when_serialized_then_roundtrips_through_toml() {
    let settings = Settings::default();

    let text = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&text).unwrap();

    assert_eq!(parsed, settings);
}

#[test]
fn given_configured_keywords_when_building_container_then_service_uses_them() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
[tiers]
manager = ["captain"]
"#,
    );
    let settings = Settings::load_from(None, Some(project.path())).unwrap();

    let container = ServiceContainer::new(settings).unwrap();

    assert_eq!(
        container.chart_service.rules().classify(Some("Team Captain")),
        Tier::Manager
    );
    assert!(container.render_options().show_avatars);
}

#[test]
fn given_env_keyword_list_when_loading_then_replaces_local_union() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
[tiers]
board = ["patron_local"]
"#,
    );

    let settings = Settings::load_from_vars(
        None,
        Some(project.path()),
        vars(&[("ORGCHART_TIERS__BOARD", "founder,patron")]),
    )
    .unwrap();

    assert_eq!(
        settings.tiers.board,
        vec!["founder".to_string(), "patron".to_string()]
    );
    assert_eq!(settings.tiers.director, TierKeywords::default().director);
}

#[test]
fn given_env_render_values_when_loading_then_override_and_keep_commas() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
[render]
empty_message = "Local message"
format = "html"
"#,
    );

    let settings = Settings::load_from_vars(
        None,
        Some(project.path()),
        vars(&[
            ("ORGCHART_RENDER__EMPTY_MESSAGE", "No data, yet"),
            ("ORGCHART_RENDER__SHOW_AVATARS", "false"),
            ("ORGCHART_RENDER__FORMAT", "JSON"),
            ("ORGCHART_DATA_FILE", "/srv/leaders.json"),
        ]),
    )
    .unwrap();

    assert_eq!(settings.render.empty_message, "No data, yet");
    assert!(!settings.render.show_avatars);
    assert_eq!(settings.render.format, OutputFormat::Json);
    assert_eq!(settings.data_file, Some(PathBuf::from("/srv/leaders.json")));
}

#[test]
fn given_unprefixed_vars_when_loading_then_ignored() {
    let settings = Settings::load_from_vars(
        None,
        None,
        vars(&[("TIERS__BOARD", "founder"), ("RENDER__SHOW_AVATARS", "false")]),
    )
    .unwrap();

    assert_eq!(settings.tiers.board, TierKeywords::default().board);
    assert!(settings.render.show_avatars);
}

#[test]
fn given_unknown_env_format_when_loading_then_config_error() {
    let err = Settings::load_from_vars(
        None,
        None,
        vars(&[("ORGCHART_RENDER__FORMAT", "pdf")]),
    )
    .unwrap_err();

    match err {
        ApplicationError::Config { message } => assert!(message.contains("pdf"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}
