use ezmin::core::models::{MergeMode, ProjectPaths};
use ezmin::core::services::TreeWalker;
use ezmin::infrastructure::{
    LightningCssProcessor, MinificationService, OxcMinifier, TokioFileSystemService,
};
use std::path::Path;
use std::sync::Arc;

fn walker(root: &Path) -> TreeWalker {
    TreeWalker::new(
        Arc::new(TokioFileSystemService),
        Arc::new(MinificationService::new()),
        Arc::new(LightningCssProcessor::new()),
        ProjectPaths::new(root.to_path_buf(), Path::new("public/build")),
    )
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

const SCRIPT_A: &str = r#"
function greet(name) {
    var message = "Hello, " + name + "!";
    console.log(message);
    return message;
}
greet("a");
"#;

const SCRIPT_B: &str = r#"
document.addEventListener("DOMContentLoaded", function () {
    var counter = 0;
    counter = counter + 1;
    console.log("loaded", counter);
});
"#;

#[tokio::test]
async fn test_minify_tree_without_merge() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "resources/js/a.js", SCRIPT_A);
    write(root.path(), "resources/js/lib/b.js", SCRIPT_B);
    write(root.path(), "resources/js/lib/vendor.min.js", "var  v = 1 ;");
    write(root.path(), "resources/js/img/logo.svg", "<svg>  </svg>");

    let out = root.path().join("public/build/assets");
    let outcome = walker(root.path())
        .walk(&root.path().join("resources/js"), &out, &MergeMode::Off, true, 0)
        .await
        .unwrap();

    assert_eq!(outcome.written.len(), 4);
    assert_eq!(outcome.failed, 0);

    let minified_a = std::fs::read_to_string(out.join("a.min.js")).unwrap();
    assert!(minified_a.len() < SCRIPT_A.len());
    assert!(minified_a.contains("greet"));
    assert!(out.join("lib/b.min.js").exists());

    // Already-minified and non-code files are copied byte-for-byte
    assert_eq!(
        std::fs::read_to_string(out.join("lib/vendor.min.js")).unwrap(),
        "var  v = 1 ;"
    );
    assert_eq!(
        std::fs::read_to_string(out.join("img/logo.svg")).unwrap(),
        "<svg>  </svg>"
    );
}

#[tokio::test]
async fn test_merge_is_ordered_and_idempotent() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "src/js/a.js", SCRIPT_A);
    write(root.path(), "src/js/b.js", SCRIPT_B);

    let out = root.path().join("public/build/assets");
    let merge = MergeMode::Named("app".to_string());
    let walker = walker(root.path());

    let outcome = walker
        .walk(&root.path().join("src/js"), &out, &merge, true, 0)
        .await
        .unwrap();

    assert_eq!(outcome.written.len(), 1);
    assert_eq!(outcome.written[0].output, out.join("app.min.js"));
    assert!(!out.join("a.min.js").exists());

    let minifier = OxcMinifier::new();
    let min_a = minifier.minify(SCRIPT_A, Path::new("a.js")).unwrap();
    let min_b = minifier.minify(SCRIPT_B, Path::new("b.js")).unwrap();

    let merged = std::fs::read_to_string(out.join("app.min.js")).unwrap();
    assert_eq!(
        merged,
        format!("/** src/js/a.js **/\n{}\n/** src/js/b.js **/\n{}", min_a, min_b)
    );

    walker
        .walk(&root.path().join("src/js"), &out, &merge, true, 0)
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(out.join("app.min.js")).unwrap(), merged);
}

#[tokio::test]
async fn test_merge_keeps_styles_separate() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "assets/site.css", "body {\n  color: red;\n}\n");
    write(root.path(), "assets/widgets/card.css", ".card {\n  margin: 0 auto;\n}\n");
    write(root.path(), "assets/widgets/card.js", SCRIPT_A);

    let out = root.path().join("public/build/assets");
    let outcome = walker(root.path())
        .walk(&root.path().join("assets"), &out, &MergeMode::Named("bundle".to_string()), false, 0)
        .await
        .unwrap();

    assert_eq!(outcome.written.len(), 2);

    let css = std::fs::read_to_string(out.join("bundle.min.css")).unwrap();
    assert!(css.starts_with("/** assets/site.css **/\n"));
    assert!(css.contains("\n/** assets/widgets/card.css **/\n"));
    assert!(!css.contains("greet"));

    let js = std::fs::read_to_string(out.join("bundle.min.js")).unwrap();
    assert!(js.starts_with("/** assets/widgets/card.js **/\n"));
    assert!(!out.join("widgets/bundle.min.css").exists());
}

#[tokio::test]
async fn test_malformed_script_does_not_stop_siblings() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "src/broken.js", "function (");
    write(root.path(), "src/ok.js", SCRIPT_B);

    let out = root.path().join("out");
    let outcome = walker(root.path())
        .walk(&root.path().join("src"), &out, &MergeMode::Off, true, 0)
        .await
        .unwrap();

    assert_eq!(outcome.failed, 1);
    assert_eq!(outcome.written.len(), 1);
    assert!(out.join("ok.min.js").exists());
    assert!(!out.join("broken.min.js").exists());
}
