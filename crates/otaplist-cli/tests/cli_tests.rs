//! Integration tests for the otaplist binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn otaplist_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("otaplist").unwrap();
    cmd.env("OTAPLIST_CONFIG", dir.path().join("config.yml"))
        .env("OTAPLIST_DB", dir.path().join("manifests.sqlite"))
        .env_remove("OTAPLIST_STORE")
        .env_remove("RUST_LOG");
    cmd
}

fn add_demo_record(dir: &TempDir) {
    otaplist_cmd(dir)
        .args([
            "record",
            "add",
            "demo123",
            "--ipa-url",
            "https://example.com/a.ipa",
            "--bundle-id",
            "com.sample.testapp",
            "--bundle-version",
            "1.0",
            "--app-name",
            "Test App",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved record 'demo123'"));
}

#[test]
fn test_generate_prints_manifest() {
    let dir = TempDir::new().unwrap();
    otaplist_cmd(&dir)
        .args([
            "generate",
            "--ipa-url",
            "https://example.com/a.ipa",
            "--bundle-id",
            "com.sample.testapp",
            "--bundle-version",
            "1.0",
            "--app-name",
            "A&B",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
        ))
        .stdout(predicate::str::contains(
            "<key>bundle-identifier</key><string>com.sample.testapp</string>",
        ))
        .stdout(predicate::str::contains("<string>A&amp;B</string>"));
}

#[test]
fn test_generate_rejects_http_url() {
    let dir = TempDir::new().unwrap();
    otaplist_cmd(&dir)
        .args([
            "generate",
            "--ipa-url",
            "http://x.com/a.ipa",
            "--bundle-id",
            "com.x",
            "--bundle-version",
            "1",
            "--app-name",
            "X",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("HTTPS"));
}

#[test]
fn test_generate_to_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("manifest.plist");
    otaplist_cmd(&dir)
        .args([
            "generate",
            "--ipa-url",
            "https://example.com/a.ipa",
            "--bundle-id",
            "com.x",
            "--bundle-version",
            "2.0",
            "--app-name",
            "X",
            "--output",
        ])
        .arg(&out)
        .assert()
        .success();

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(content.ends_with("</plist>"));
    assert!(content.contains("<key>bundle-version</key><string>2.0</string>"));
}

#[test]
fn test_record_add_and_get() {
    let dir = TempDir::new().unwrap();
    add_demo_record(&dir);

    otaplist_cmd(&dir)
        .args(["record", "get", "demo123"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<string>https://example.com/a.ipa</string>",
        ))
        .stdout(predicate::str::contains("<string>com.sample.testapp</string>"));
}

#[test]
fn test_record_get_missing() {
    let dir = TempDir::new().unwrap();
    otaplist_cmd(&dir)
        .args(["record", "get", "missing-id"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing-id"));
}

#[test]
fn test_record_list_and_remove() {
    let dir = TempDir::new().unwrap();

    otaplist_cmd(&dir)
        .args(["record", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records"));

    add_demo_record(&dir);

    otaplist_cmd(&dir)
        .args(["record", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"demo123\""))
        .stdout(predicate::str::contains("\"bundleId\": \"com.sample.testapp\""));

    otaplist_cmd(&dir)
        .args(["record", "rm", "demo123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed record 'demo123'"));

    otaplist_cmd(&dir)
        .args(["record", "remove", "demo123"])
        .assert()
        .code(2);
}

#[test]
fn test_record_add_rejects_invalid() {
    let dir = TempDir::new().unwrap();
    otaplist_cmd(&dir)
        .args([
            "record",
            "add",
            "bad",
            "--ipa-url",
            "ftp://example.com/a.ipa",
            "--bundle-id",
            "com.x",
            "--bundle-version",
            "1",
            "--app-name",
            "X",
        ])
        .assert()
        .code(3);
}

#[test]
fn test_serve_require_store_fails_fast() {
    let dir = TempDir::new().unwrap();
    otaplist_cmd(&dir)
        .env_remove("FIREBASE_PROJECT_ID")
        .env_remove("FIREBASE_ACCESS_TOKEN")
        .env_remove("FIREBASE_API_KEY")
        .args([
            "serve",
            "--bind",
            "127.0.0.1:0",
            "--store",
            "firestore",
            "--require-store",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Firestore"));
}

#[test]
fn test_bad_config_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.yml"), "server: [unclosed").unwrap();
    otaplist_cmd(&dir)
        .args(["record", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("YAML"));
}
