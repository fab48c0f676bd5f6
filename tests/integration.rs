//! Integration tests for codeslice


use assert_cmd::Command;
use harness::{TestTree, run_codeslice};
use predicates::prelude::*;
use serde_json::{Value, json};

fn stdout_json(stdout: &str) -> Value {
    serde_json::from_str(stdout).unwrap_or_else(|e| panic!("invalid JSON ({}): {}", e, stdout))
}

#[test]
fn test_filter_ext_copies_matching_files() {
    let tree = TestTree::new();
    tree.add_file("raw/a.txt", "text");
    tree.add_file("raw/b.py", "print(1)");
    tree.add_file("raw/.hidden", "secret");

    let (stdout, _stderr, success) = run_codeslice(
        tree.path(),
        &["--json", "filter-ext", "--mode", "in", "-p", ".py", "raw", "out"],
    );
    assert!(success, "filter-ext should succeed");
    assert_eq!(stdout_json(&stdout), json!({"b.py": 1}));
    assert!(tree.exists("out/b.py"));
    assert!(!tree.exists("out/a.txt"));
    assert!(!tree.exists("out/.hidden"));
    assert!(tree.exists("raw/a.txt"), "source must be left untouched");
}

#[test]
fn test_filter_name_deletes_in_place() {
    let tree = TestTree::new();
    tree.add_file("work/setup.py", "");
    tree.add_file("work/pkg/setup.py", "");
    tree.add_file("work/main.py", "");

    let (stdout, _stderr, success) = run_codeslice(
        tree.path(),
        &["filter-name", "--mode", "out", "-p", "setup.py", "work", "--color", "never"],
    );
    assert!(success);
    assert!(stdout.contains("1 total"), "{}", stdout);
    assert!(!tree.exists("work/setup.py"));
    assert!(!tree.exists("work/pkg/setup.py"));
    assert!(tree.exists("work/main.py"));
}

#[test]
fn test_divide_method_dataset() {
    let tree = TestTree::new();
    tree.add_file(
        "src/Foo.java",
        "class Foo { void bar() { return; } }",
    );
    tree.add_file("src/shapes.cpp", "struct Point { int x; };\nint area() { return 1; }\n");
    tree.add_file("src/notes.txt", "not code");

    let (stdout, _stderr, success) =
        run_codeslice(tree.path(), &["--json", "divide", "-d", "method", "-j", "1", "src", "div"]);
    assert!(success);
    let report = stdout_json(&stdout);
    assert_eq!(report["division"], "method");
    assert_eq!(report["files_visited"], 3);
    assert_eq!(report["records"], 2);

    let records = tree.read_jsonl("div/unprocessed_dataset.jsonl");
    assert_eq!(
        records[0],
        json!({"filepath": "Foo.java", "method": {"name": "bar", "content": "{ return; }"}})
    );
    assert_eq!(records[1]["method"]["name"], "area");
    assert_eq!(records[1]["filepath"], "shapes.cpp");
}

#[test]
fn test_divide_line_dataset() {
    let tree = TestTree::new();
    tree.add_file("src/a.py", "import os\n\n    x = 1   \n");

    let (_stdout, _stderr, success) =
        run_codeslice(tree.path(), &["divide", "--division", "line", "src", "div"]);
    assert!(success);

    let lines: Vec<Value> = tree
        .read_jsonl("div/unprocessed_dataset.jsonl")
        .into_iter()
        .map(|r| r["line"].clone())
        .collect();
    assert_eq!(lines, vec![json!("import os"), json!("x = 1")]);
}

#[test]
fn test_process_round_trip() {
    let tree = TestTree::new();
    tree.add_file(
        "src/Shapes.java",
        "class Circle { double r() { return 1; } }\nclass Square { }\n",
    );

    let (_, _, success) = run_codeslice(tree.path(), &["divide", "-d", "class", "src", "div"]);
    assert!(success);

    let (stdout, _, success) = run_codeslice(
        tree.path(),
        &[
            "--json",
            "process",
            "-d",
            "class",
            "--mode",
            "in",
            "-p",
            "Circle",
            "div/unprocessed_dataset.jsonl",
            "in",
        ],
    );
    assert!(success);
    assert_eq!(stdout_json(&stdout)["kept"], 1);
    assert_eq!(tree.read_jsonl("in/processed_dataset.jsonl")[0]["class"]["name"], "Circle");

    let (stdout, _, success) = run_codeslice(
        tree.path(),
        &[
            "--json",
            "process",
            "-d",
            "class",
            "--mode",
            "out",
            "-p",
            "Circle",
            "in/processed_dataset.jsonl",
            "out",
        ],
    );
    assert!(success);
    assert_eq!(stdout_json(&stdout)["kept"], 0);
    assert!(tree.read_jsonl("out/processed_dataset.jsonl").is_empty());
}

#[test]
fn test_process_can_refilter_its_own_output() {
    let tree = TestTree::new();
    tree.add_file(
        "processed/processed_dataset.jsonl",
        concat!(
            r#"{"filepath":"A.java","method":{"name":"run","content":"{ }"}}"#,
            "\n",
            r#"{"filepath":"A.java","method":{"name":"stop","content":"{ }"}}"#,
            "\n",
        ),
    );

    let (stdout, _, success) = run_codeslice(
        tree.path(),
        &[
            "--json",
            "process",
            "-d",
            "method",
            "--mode",
            "in",
            "-p",
            "run",
            "processed/processed_dataset.jsonl",
            "processed",
        ],
    );
    assert!(success);
    assert_eq!(stdout_json(&stdout)["kept"], 1);
    assert_eq!(
        std::fs::read_to_string(tree.path().join("processed/processed_dataset.jsonl")).unwrap(),
        "{\"filepath\":\"A.java\",\"method\":{\"name\":\"run\",\"content\":\"{ }\"}}\n"
    );
}

#[test]
fn test_run_pipeline_from_config() {
    let tree = TestTree::new();
    tree.add_file("ws/raw/app/Main.java", "class Main { void main() { run(); } void run() { } }");
    tree.add_file("ws/raw/app/tool.py", "class Tool:\n    def go(self):\n        pass\n");
    tree.add_file("ws/raw/docs/guide.md", "# Guide\n");
    tree.add_file(
        "pipeline.json",
        r#"{
            "divisions": ["method", "class", "line"],
            "filters": {
                "file_extension": {"mode": "in", "patterns": [".java", ".py"]},
                "method_name": {"mode": "out", "patterns": ["main"]}
            },
            "jobs": 2
        }"#,
    );

    let (stdout, _stderr, success) =
        run_codeslice(tree.path(), &["--json", "run", "pipeline.json", "ws"]);
    assert!(success, "run should succeed");
    let report = stdout_json(&stdout);
    assert_eq!(report["extension_counter"], json!({"Main.java": 1, "tool.py": 1}));
    assert_eq!(report["datasets"].as_array().unwrap().len(), 3);
    assert_eq!(report["processed"].as_array().unwrap().len(), 2);

    let methods = tree.read_jsonl("ws/processed/method/processed_dataset.jsonl");
    let names: Vec<&str> = methods
        .iter()
        .map(|m| m["method"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["run", "go"]);

    let classes = tree.read_jsonl("ws/processed/class/processed_dataset.jsonl");
    assert_eq!(classes.len(), 2);
    assert!(tree.exists("ws/divisioned/line/unprocessed_dataset.jsonl"));
    assert!(!tree.exists("ws/processed/line"));
    assert!(!tree.exists("ws/file_filtered/docs/guide.md"));
}

#[test]
fn test_human_output_for_divide() {
    let tree = TestTree::new();
    tree.add_file("src/a.py", "def f():\n    pass\n");

    Command::cargo_bin("codeslice")
        .unwrap()
        .current_dir(tree.path())
        .args(["--color", "never", "divide", "-d", "method", "src", "div"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dataset (method)"))
        .stdout(predicate::str::contains("Records:      1"));
}

#[test]
fn test_missing_source_is_an_error() {
    let tree = TestTree::new();

    Command::cargo_bin("codeslice")
        .unwrap()
        .current_dir(tree.path())
        .env_remove("RUST_LOG")
        .args(["filter-ext", "--mode", "in", "-p", ".py", "missing", "out"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("codeslice: source folder does not exist"));
}

#[test]
fn test_line_division_cannot_be_processed() {
    let tree = TestTree::new();
    tree.add_file("data.jsonl", "{\"filepath\":\"a\",\"line\":\"x\"}\n");

    Command::cargo_bin("codeslice")
        .unwrap()
        .current_dir(tree.path())
        .args(["process", "-d", "line", "--mode", "in", "-p", "x", "data.jsonl", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be record-filtered"));
    assert!(!tree.exists("out"));
}

#[test]
fn test_invalid_mode_rejected_by_cli() {
    let tree = TestTree::new();
    tree.add_file("src/a.py", "");

    let (_stdout, stderr, success) =
        run_codeslice(tree.path(), &["filter-name", "--mode", "sideways", "src"]);
    assert!(!success);
    assert!(stderr.contains("sideways"), "{}", stderr);
    assert!(tree.exists("src/a.py"));
}

#[test]
fn test_bad_pipeline_config() {
    let tree = TestTree::new();
    tree.add_file("ws/raw/a.py", "");
    tree.add_file("pipeline.json", r#"{"divisions": ["paragraph"]}"#);

    Command::cargo_bin("codeslice")
        .unwrap()
        .current_dir(tree.path())
        .args(["run", "pipeline.json", "ws"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
    assert!(!tree.exists("ws/file_filtered"));
}
