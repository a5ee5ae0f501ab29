use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn snaptree() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("snaptree"));
    cmd.env_remove("SNAPTREE_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn snapshot_writes_expected_mapping_document() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();

    write_file(&root.path().join("a.txt"), "héllo".as_bytes());
    write_file(&root.path().join("ignoreMe/secret.txt"), b"secret");
    write_file(&root.path().join("binary.dat"), &[0x10, 0x00, 0x20]);

    let doc = out.path().join("snap.json");
    snaptree()
        .arg("--root")
        .arg(root.path())
        .arg("snapshot")
        .arg("--no-default-ignores")
        .arg("--ignore-dir")
        .arg("ignoreMe")
        .arg("--output")
        .arg(&doc)
        .assert()
        .success();

    let value = read_json(&doc);
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(value["a.txt"], "héllo");
    assert_eq!(value["binary.dat"], "Binary File CANNOT Be Read");
    assert!(object.keys().all(|k| !k.starts_with("ignoreMe/")));

    // non-ASCII is written verbatim, not \u-escaped
    assert!(fs::read_to_string(&doc).unwrap().contains("héllo"));
}

#[test]
fn snapshot_json_report_counts_files_and_dirs() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();

    write_file(&root.path().join("src/main.rs"), b"fn main() {}\n");
    write_file(&root.path().join("README.md"), b"# readme\n");

    let assert = snaptree()
        .arg("--root")
        .arg(root.path())
        .arg("--report")
        .arg("json")
        .arg("snapshot")
        .arg("--format")
        .arg("both")
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["kind"], "snapshot");
    let documents = report["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);
    for doc in documents {
        assert_eq!(doc["files"], 2);
        assert_eq!(doc["dirs"], 1);
    }

    assert!(out.path().join("project_content.json").is_file());
    let xml = fs::read_to_string(out.path().join("project_content.xml")).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project>\n"));
    assert!(xml.contains("<file path=\"src/main.rs\">"));
}

#[test]
fn default_ignores_apply_without_flags() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();

    write_file(&root.path().join(".git/HEAD"), b"ref: refs/heads/main\n");
    write_file(&root.path().join("node_modules/pkg/index.js"), b"module.exports = 1;\n");
    write_file(&root.path().join("logo.PNG"), b"not really a png");
    write_file(&root.path().join("app.js"), b"console.log(1);\n");

    let doc = out.path().join("snap.json");
    snaptree()
        .arg("--root")
        .arg(root.path())
        .arg("snapshot")
        .arg("--output")
        .arg(&doc)
        .assert()
        .success();

    let value = read_json(&doc);
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["app.js", "logo.PNG"]);
    assert_eq!(value["logo.PNG"], "Binary File CANNOT Be Read");
}

#[test]
fn config_file_overrides_defaults() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();

    write_file(&root.path().join("target/debug/app"), b"binary-ish");
    write_file(&root.path().join("node_modules/x.js"), b"x");
    write_file(&root.path().join("lib.rs"), b"pub fn f() {}\n");

    let config = out.path().join("snaptree.json");
    fs::write(
        &config,
        r#"{"ignore_dirs": ["target"], "ignore_extensions": [], "json_file": "custom.json"}"#,
    )
    .unwrap();

    snaptree()
        .arg("--root")
        .arg(root.path())
        .arg("--config")
        .arg(&config)
        .arg("snapshot")
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success();

    let value = read_json(&out.path().join("custom.json"));
    let object = value.as_object().unwrap();
    assert!(object.contains_key("lib.rs"));
    assert!(object.contains_key("node_modules/x.js"));
    assert!(!object.keys().any(|k| k.starts_with("target")));
}

#[test]
fn snapshot_then_restore_round_trips() {
    for ext in ["json", "xml"] {
        let root = tempdir().unwrap();
        let work = tempdir().unwrap();

        let files: [(&str, &str); 3] = [
            ("a.txt", "héllo\n"),
            ("src/lib.rs", "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n"),
            ("docs/guide/intro.md", "# Intro\r\n\r\n<b>bold</b> & more ]]> end\r\n"),
        ];
        for (path, content) in files {
            write_file(&root.path().join(path), content.as_bytes());
        }

        let doc = work.path().join(format!("snap.{}", ext));
        snaptree()
            .arg("--root")
            .arg(root.path())
            .arg("snapshot")
            .arg("--output")
            .arg(&doc)
            .assert()
            .success();

        let target = work.path().join("restored");
        snaptree()
            .arg("restore")
            .arg(&doc)
            .arg("--target")
            .arg(&target)
            .assert()
            .success()
            .stdout(predicate::str::contains("3/3 files"));

        for (path, content) in files {
            assert_eq!(
                fs::read(target.join(path)).unwrap(),
                content.as_bytes(),
                "{} differs after {} round trip",
                path,
                ext
            );
        }
    }
}

#[test]
fn restore_reports_partial_failure_without_error() {
    let work = tempdir().unwrap();
    let doc = work.path().join("doc.json");
    fs::write(
        &doc,
        r#"{"clash": "a file", "clash/inside.txt": "cannot exist", "fine.txt": "ok"}"#,
    )
    .unwrap();

    let target = work.path().join("out");
    let assert = snaptree()
        .arg("--report")
        .arg("json")
        .arg("restore")
        .arg(&doc)
        .arg("--target")
        .arg(&target)
        .assert()
        .success();

    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["kind"], "restore");
    assert_eq!(report["total"], 3);
    assert_eq!(report["written"], 2);
    assert_eq!(report["failures"][0]["path"], "clash/inside.txt");
    assert_eq!(fs::read_to_string(target.join("fine.txt")).unwrap(), "ok");
}

#[test]
fn restore_rejects_unsupported_extension() {
    let work = tempdir().unwrap();
    let doc = work.path().join("doc.yaml");
    fs::write(&doc, "a.txt: hello\n").unwrap();

    snaptree()
        .arg("restore")
        .arg(&doc)
        .arg("--target")
        .arg(work.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported document type"));

    assert!(!work.path().join("out").exists());
}

#[test]
fn restore_rejects_empty_document() {
    let work = tempdir().unwrap();
    let doc = work.path().join("doc.json");
    fs::write(&doc, "{}").unwrap();

    snaptree()
        .arg("restore")
        .arg(&doc)
        .arg("--target")
        .arg(work.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No restorable files"));
}

#[test]
fn snapshot_rejects_unknown_output_extension() {
    let root = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"a");

    snaptree()
        .arg("--root")
        .arg(root.path())
        .arg("snapshot")
        .arg("--output")
        .arg(work.path().join("snap.md"))
        .assert()
        .failure();
}

#[test]
fn repeated_default_snapshot_skips_its_own_document() {
    let root = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"a");

    for _ in 0..2 {
        snaptree()
            .current_dir(root.path())
            .arg("snapshot")
            .assert()
            .success();
    }

    let value = read_json(&root.path().join("project_content.json"));
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["a.txt"]);
}

#[cfg(unix)]
#[test]
fn snapshot_reads_through_file_symlinks() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("real.txt"), b"shared");
    std::os::unix::fs::symlink(root.path().join("real.txt"), root.path().join("link.txt"))
        .unwrap();

    let doc = out.path().join("snap.json");
    snaptree()
        .arg("--root")
        .arg(root.path())
        .arg("snapshot")
        .arg("--output")
        .arg(&doc)
        .assert()
        .success();

    let value = read_json(&doc);
    assert_eq!(value["link.txt"], "shared");
    assert_eq!(value["real.txt"], "shared");
}
