use ezmin::core::manifest::ManifestUpdater;
use ezmin::core::models::{InputEntry, MergeMode, MinifyConfig};
use ezmin::infrastructure::{LightningCssProcessor, MinificationService, TokioFileSystemService};
use ezmin::utils::EzminError;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

const MANIFEST: &str = r#"{
  "resources/js/app.js": {
    "file": "assets/app-4ed993c7.js",
    "src": "resources/js/app.js",
    "isEntry": true
  },
  "resources/css/app.css": {
    "file": "assets/app-9f3a.css",
    "src": "resources/css/app.css",
    "isEntry": true
  }
}"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn updater(config: &MinifyConfig) -> ManifestUpdater {
    ManifestUpdater::new(
        Arc::new(TokioFileSystemService),
        Arc::new(MinificationService::new()),
        Arc::new(LightningCssProcessor::new()),
        config.paths(),
    )
}

fn read_manifest(root: &Path) -> serde_json::Map<String, Value> {
    let content = std::fs::read_to_string(root.join("public/build/manifest.json")).unwrap();
    match serde_json::from_str(&content).unwrap() {
        Value::Object(map) => map,
        other => panic!("manifest is not an object: {}", other),
    }
}

#[tokio::test]
async fn test_merged_input_registers_one_entry() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "public/build/manifest.json", MANIFEST);
    write(root.path(), "src/js/a.js", "function a() { return 1 + 1; }\na();\n");
    write(root.path(), "src/js/b.js", "function b() { return 'b'; }\nb();\n");

    let config = MinifyConfig::new(root.path().to_path_buf()).with_input(
        InputEntry::new("src/js").with_merge(MergeMode::Named("app".to_string())),
    );

    let report = updater(&config).update(&config).await.unwrap();
    assert_eq!(report.inputs_processed, 1);
    assert_eq!(report.files_written, 1);

    let manifest = read_manifest(root.path());
    assert_eq!(manifest.len(), 3);
    assert_eq!(
        manifest["src/js"],
        serde_json::json!({"file": "assets/app.min.js", "src": "src/js", "isEntry": true})
    );
    assert_eq!(
        manifest["resources/js/app.js"]["file"],
        "assets/app-4ed993c7.js"
    );

    let merged =
        std::fs::read_to_string(root.path().join("public/build/assets/app.min.js")).unwrap();
    assert!(merged.starts_with("/** src/js/a.js **/\n"));
    assert!(merged.contains("\n/** src/js/b.js **/\n"));
}

#[tokio::test]
async fn test_unmerged_input_registers_each_file() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "public/build/manifest.json", MANIFEST);
    write(root.path(), "resources/static/styles/x.css", "a {\n  color: red;\n}\n");
    write(root.path(), "resources/static/logo.png", "PNG");

    let config = MinifyConfig::new(root.path().to_path_buf())
        .with_input(InputEntry::new("resources/static"));

    updater(&config).update(&config).await.unwrap();

    let manifest = read_manifest(root.path());
    assert_eq!(manifest.len(), 4);
    assert_eq!(
        manifest["resources/static/styles/x.css"]["file"],
        "assets/styles/x.min.css"
    );
    assert_eq!(manifest["resources/static/logo.png"]["file"], "assets/logo.png");
    assert!(root
        .path()
        .join("public/build/assets/styles/x.min.css")
        .exists());
}

#[tokio::test]
async fn test_rerun_overwrites_instead_of_duplicating() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "public/build/manifest.json", MANIFEST);
    write(root.path(), "src/a.js", "var a = 1;");
    write(root.path(), "src/b.css", "b { margin: 0; }");

    let config =
        MinifyConfig::new(root.path().to_path_buf()).with_input(InputEntry::new("src"));
    let updater = updater(&config);

    updater.update(&config).await.unwrap();
    assert_eq!(read_manifest(root.path()).len(), 2 + 2);

    updater.update(&config).await.unwrap();
    assert_eq!(read_manifest(root.path()).len(), 2 + 2);
}

#[tokio::test]
async fn test_missing_source_is_skipped() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "public/build/manifest.json", MANIFEST);
    write(root.path(), "src/a.js", "var a = 1;");

    let config = MinifyConfig::new(root.path().to_path_buf())
        .with_input(InputEntry::new("does/not/exist"))
        .with_input(InputEntry::new("src"));

    let report = updater(&config).update(&config).await.unwrap();
    assert_eq!(report.inputs_skipped, 1);
    assert_eq!(report.inputs_processed, 1);

    let manifest = read_manifest(root.path());
    assert_eq!(manifest.len(), 3);
    assert!(manifest.contains_key("src/a.js"));
}

#[tokio::test]
async fn test_missing_manifest_aborts_without_writing() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "src/a.js", "var a = 1;");

    let config =
        MinifyConfig::new(root.path().to_path_buf()).with_input(InputEntry::new("src"));

    let err = updater(&config).update(&config).await.unwrap_err();

    assert!(matches!(err, EzminError::ManifestNotFound(_)));
    assert!(!root.path().join("public/build/manifest.json").exists());
    assert!(!root.path().join("public/build/assets").exists());
}

#[tokio::test]
async fn test_custom_build_dir_and_output() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "dist/manifest.json", "{}");
    write(root.path(), "web/app.js", "var app = 1;");

    let mut config = MinifyConfig::new(root.path().to_path_buf())
        .with_input(InputEntry::new("web/app.js").with_output("dist/js"));
    config.manifest_path = "dist/manifest.json".into();
    config.build_dir = "dist".into();

    updater(&config).update(&config).await.unwrap();

    let content = std::fs::read_to_string(root.path().join("dist/manifest.json")).unwrap();
    let manifest: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(manifest["web/app.js"]["file"], "js/app.min.js");
    assert!(content.starts_with("{\n  \"web/app.js\""));
}

#[tokio::test]
async fn test_nested_merge_registers_top_level_bundle_only() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "public/build/manifest.json", MANIFEST);
    write(root.path(), "src/js/a.js", "function a() { return 1 + 1; }\na();\n");
    write(root.path(), "src/js/widgets/b.js", "function b() { return 'b'; }\nb();\n");

    let config = MinifyConfig::new(root.path().to_path_buf()).with_input(
        InputEntry::new("src/js")
            .with_merge(MergeMode::Named("app".to_string()))
            .with_keep_structure(true),
    );

    let report = updater(&config).update(&config).await.unwrap();
    assert_eq!(report.files_written, 1);

    let manifest = read_manifest(root.path());
    assert_eq!(manifest.len(), 3);
    assert_eq!(manifest["src/js"]["file"], "assets/app.min.js");
    assert!(!manifest.contains_key("src/js/widgets"));

    let nested =
        std::fs::read_to_string(root.path().join("public/build/assets/widgets/app.min.js"))
            .unwrap();
    assert!(nested.starts_with("/** src/js/widgets/b.js **/\n"));
    let top = std::fs::read_to_string(root.path().join("public/build/assets/app.min.js")).unwrap();
    assert!(top.starts_with("/** src/js/a.js **/\n"));
    assert!(!top.contains("widgets"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_entry_does_not_drop_input() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "public/build/manifest.json", MANIFEST);
    write(root.path(), "src/a.js", "var a = 1;");
    std::os::unix::fs::symlink(root.path().join("nowhere.css"), root.path().join("src/broken.css"))
        .unwrap();

    let config =
        MinifyConfig::new(root.path().to_path_buf()).with_input(InputEntry::new("src"));

    let report = updater(&config).update(&config).await.unwrap();
    assert_eq!(report.inputs_processed, 1);
    assert_eq!(report.failures, 1);

    let manifest = read_manifest(root.path());
    assert_eq!(manifest["src/a.js"]["file"], "assets/a.min.js");
    assert!(!manifest.contains_key("src/broken.css"));
    assert!(root.path().join("public/build/assets/a.min.js").exists());
}
