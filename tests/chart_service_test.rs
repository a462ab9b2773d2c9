//! Tests for ChartService: loading, memoization, rendering, output

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use orgchart::application::services::ChartService;
use orgchart::application::{ApplicationError, OutputFormat, RenderOptions};
use orgchart::config::Settings;
use orgchart::domain::{Leader, TierRules};
use orgchart::infrastructure::di::ServiceContainer;
use orgchart::infrastructure::traits::{FileSystem, RealFileSystem};
use orgchart::util::testing;

/// In-memory filesystem recording writes.
#[derive(Default)]
struct MemFs {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemFs {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }

    fn get(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.get(&path.to_string_lossy())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

const LEADERS_JSON: &str = r#"[
  {"id": 1, "name": "Ada Obi", "position": "President", "department": null, "image_url": null},
  {"id": 2, "name": "Ben Cole", "position": "Finance Director", "department": "Finance"},
  {"id": 3, "name": "Cy Dunn", "position": "Treasurer", "department": "Finance", "email": "cy@example.org"}
]"#;

fn service(fs: Arc<dyn FileSystem>) -> ChartService {
    testing::init_test_setup();
    ChartService::new(fs, TierRules::default())
}

#[test]
fn given_leader_file_when_loading_chart_then_assembles_hierarchy() {
    // Arrange
    let fs = Arc::new(MemFs::with_file("leaders.json", LEADERS_JSON));
    let service = service(fs);

    // Act
    let chart = service.load_chart(Path::new("leaders.json")).unwrap();

    // Assert
    let hierarchy = chart.to_hierarchy();
    assert_eq!(hierarchy.len(), 1);
    assert_eq!(hierarchy[0].leader.id, "1");
    assert_eq!(hierarchy[0].children[0].leader.name, "Ben Cole");
    assert_eq!(
        hierarchy[0].children[0].children[0].leader.email.as_deref(),
        Some("cy@example.org")
    );
}

#[test]
fn given_same_leaders_twice_when_charting_then_memoized() {
    let service = service(Arc::new(MemFs::default()));
    let leaders = vec![
        Leader::new("1", "Ada", Some("Chair"), None),
        Leader::new("2", "Ben", Some("Head of Media"), None),
    ];

    let first = service.chart(&leaders).unwrap();
    let second = service.chart(&leaders.clone()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(service.assemblies(), 1);
}

#[test]
fn given_changed_leaders_when_charting_then_reassembles() {
    let service = service(Arc::new(MemFs::default()));
    let mut leaders = vec![Leader::new("1", "Ada", Some("Chair"), None)];

    let first = service.chart(&leaders).unwrap();
    leaders.push(Leader::new("2", "Ben", Some("Head of Media"), None));
    let second = service.chart(&leaders).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 2);
    assert_eq!(service.assemblies(), 2);
}

#[test]
fn given_cleared_cache_when_charting_then_reassembles() {
    let service = service(Arc::new(MemFs::default()));
    let leaders = vec![Leader::new("1", "Ada", Some("Chair"), None)];

    service.chart(&leaders).unwrap();
    service.clear_cache();
    service.chart(&leaders).unwrap();

    assert_eq!(service.assemblies(), 2);
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let service = service(Arc::new(MemFs::default()));

    let err = service.load_chart(Path::new("missing.json")).unwrap_err();

    match err {
        ApplicationError::OperationFailed { context, .. } => {
            assert!(context.contains("missing.json"), "context: {context}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_malformed_json_when_loading_then_invalid_input() {
    let fs = Arc::new(MemFs::with_file("bad.json", "[{\"id\": 1, \"name\": }]"));
    let service = service(fs);

    let err = service.load_chart(Path::new("bad.json")).unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidInput { ref origin, .. } if origin == "bad.json"));
}

#[test]
fn given_empty_array_when_rendering_then_empty_message() {
    let fs = Arc::new(MemFs::with_file("empty.json", "[]"));
    let service = service(fs);
    let options = RenderOptions {
        empty_message: "No leaders yet".to_string(),
        ..Default::default()
    };

    let out = service
        .render_source(Path::new("empty.json"), OutputFormat::Text, &options)
        .unwrap();

    assert_eq!(out.trim(), "No leaders yet");
}

#[test]
fn given_leaders_when_computing_stats_then_counts_tiers() {
    let fs = Arc::new(MemFs::with_file("leaders.json", LEADERS_JSON));
    let service = service(fs);

    let stats = service.stats(Path::new("leaders.json")).unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.roots, 1);
    assert_eq!(stats.promoted, 0);
    assert_eq!(stats.depth, 3);
}

#[test]
fn given_output_path_when_writing_then_file_has_content() {
    let fs = Arc::new(MemFs::with_file("leaders.json", LEADERS_JSON));
    let service = service(fs.clone());

    let html = service
        .render_source(Path::new("leaders.json"), OutputFormat::Html, &RenderOptions::default())
        .unwrap();
    service.write_output(Path::new("out/chart.html"), &html).unwrap();

    let written = fs.get("out/chart.html").expect("output written");
    assert!(written.contains("Ada Obi"));
}

#[test]
fn given_real_filesystem_when_rendering_to_nested_path_then_creates_directories() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("leaders.json");
    std::fs::write(&source, LEADERS_JSON).unwrap();
    let target = temp.path().join("public/org/chart.json");
    let service = service(Arc::new(RealFileSystem));

    let json = service
        .render_source(&source, OutputFormat::Json, &RenderOptions::default())
        .unwrap();
    service.write_output(&target, &json).unwrap();

    let written = std::fs::read_to_string(&target).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value[0]["leader"]["name"], "Ada Obi");
}

#[test]
fn given_container_with_custom_filesystem_when_rendering_then_reads_and_writes_through_it() {
    testing::init_test_setup();
    let fs = Arc::new(MemFs::with_file("leaders.json", LEADERS_JSON));
    let mut settings = Settings::default();
    settings.tiers.manager = vec!["treasurer".to_string()];
    let container = ServiceContainer::with_deps(settings, fs.clone()).unwrap();

    let text = container
        .chart_service
        .render_source(
            Path::new("leaders.json"),
            OutputFormat::Text,
            &container.render_options(),
        )
        .unwrap();
    container
        .chart_service
        .write_output(Path::new("chart.txt"), &text)
        .unwrap();

    assert_eq!(fs.get("chart.txt").as_deref(), Some(text.as_str()));
    assert!(text.contains("Cy Dunn (Treasurer) [Finance]"));
}
