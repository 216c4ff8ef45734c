use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn quill_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("quill");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let articles_dir = root.join("articles");
    fs::create_dir_all(&articles_dir).unwrap();
    fs::write(articles_dir.join("test.md"), "# Hello\n\nWorld").unwrap();
    fs::write(
        articles_dir.join("no-heading.md"),
        "Just a paragraph, no heading anywhere.",
    )
    .unwrap();

    // Token env var is deliberately unique and unset; endpoint is a port
    // nothing listens on, so an accidental network call fails loudly.
    let config_content = r#"[site]
base_url = "https://example.github.io/notes"
raw_base_url = "https://raw.example/notes/main"
remote = "origin"
branch = "main"

[deploy]
strategy = "poll"
attempts = 2
interval_secs = 0

[reader]
endpoint = "http://127.0.0.1:9/save/"
token_env = "QUILLPOST_INTEGRATION_TOKEN"
default_tags = ["blog"]
location = "feed"
timeout_secs = 5
"#;

    let config_path = root.join("quill.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_quill(config_path: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let binary = quill_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("QUILLPOST_INTEGRATION_TOKEN")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run quill binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code())
}

#[test]
fn test_convert_extracts_h1_title() {
    let (tmp, config_path) = setup_test_env();
    let input = tmp.path().join("articles/test.md");

    let (stdout, stderr, code) = run_quill(&config_path, &["convert", input.to_str().unwrap()]);
    assert_eq!(code, Some(0), "convert failed: {}", stderr);
    assert!(stdout.contains("title: Hello"));

    let html = fs::read_to_string(tmp.path().join("articles/test.html")).unwrap();
    assert!(html.contains("<title>Hello</title>"));
    assert!(html.contains("<p>World</p>"));
}

#[test]
fn test_convert_falls_back_to_file_stem() {
    let (tmp, config_path) = setup_test_env();
    let input = tmp.path().join("articles/no-heading.md");

    let (stdout, _, code) = run_quill(&config_path, &["convert", input.to_str().unwrap()]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("title: no-heading"));

    let html = fs::read_to_string(tmp.path().join("articles/no-heading.html")).unwrap();
    assert!(html.contains("<title>no-heading</title>"));
}

#[test]
fn test_convert_is_idempotent() {
    let (tmp, config_path) = setup_test_env();
    let input = tmp.path().join("articles/test.md");
    let output = tmp.path().join("articles/test.html");

    run_quill(&config_path, &["convert", input.to_str().unwrap()]);
    let first = fs::read(&output).unwrap();
    run_quill(&config_path, &["convert", input.to_str().unwrap()]);
    let second = fs::read(&output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_convert_honors_explicit_output_path() {
    let (tmp, config_path) = setup_test_env();
    let input = tmp.path().join("articles/test.md");
    let output = tmp.path().join("elsewhere.html");

    let (_, _, code) = run_quill(
        &config_path,
        &["convert", input.to_str().unwrap(), output.to_str().unwrap()],
    );
    assert_eq!(code, Some(0));
    assert!(output.exists());
}

#[test]
fn test_convert_missing_file_names_the_path() {
    let (tmp, config_path) = setup_test_env();
    let missing = tmp.path().join("articles/ghost.md");

    let (_, stderr, code) = run_quill(&config_path, &["convert", missing.to_str().unwrap()]);
    assert_ne!(code, Some(0));
    assert!(stderr.contains("ghost.md"), "stderr: {}", stderr);
}

#[test]
fn test_publish_refuses_missing_file() {
    let (tmp, config_path) = setup_test_env();
    let missing = tmp.path().join("articles/ghost.md");

    let (_, stderr, code) = run_quill(
        &config_path,
        &["publish", missing.to_str().unwrap(), "Ghost"],
    );
    assert_ne!(code, Some(0));
    assert!(stderr.contains("ghost.md"), "stderr: {}", stderr);
    // Refused before rendering: no sibling HTML appears.
    assert!(!tmp.path().join("articles/ghost.html").exists());
}

#[test]
fn test_publish_usage_error_exits_one() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, code) = run_quill(&config_path, &["publish"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);

    let (_, stderr, code) = run_quill(&config_path, &["publish", "only-a-file.md"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("Usage"), "stderr: {}", stderr);
}

#[test]
fn test_publish_fails_fast_without_token() {
    let (tmp, config_path) = setup_test_env();
    let input = tmp.path().join("articles/test.md");

    let (_, stderr, code) = run_quill(&config_path, &["publish", input.to_str().unwrap(), "Hello"]);
    assert_ne!(code, Some(0));
    assert!(
        stderr.contains("QUILLPOST_INTEGRATION_TOKEN"),
        "stderr: {}",
        stderr
    );
    // The credential check precedes every side effect: nothing was rendered,
    // and no commit was attempted in this non-repository directory.
    assert!(!tmp.path().join("articles/test.html").exists());
}

#[test]
fn test_publish_dry_run_renders_and_plans_only() {
    let (tmp, config_path) = setup_test_env();
    let input = tmp.path().join("articles/test.md");

    let (stdout, stderr, code) = run_quill(
        &config_path,
        &["publish", input.to_str().unwrap(), "Hello", "a,b,c", "--dry-run"],
    );
    assert_eq!(code, Some(0), "dry-run failed: {}", stderr);
    assert!(tmp.path().join("articles/test.html").exists());
    assert!(stdout.contains("would commit: Publish: Hello"));
    assert!(stdout.contains("would bookmark: https://example.github.io/notes/test.html"));
    assert!(stdout.contains("tags: a, b, c"));
}

#[test]
fn test_send_refuses_missing_file() {
    let (tmp, config_path) = setup_test_env();
    let missing = tmp.path().join("nope.html");

    let (_, stderr, code) = run_quill(&config_path, &["send", missing.to_str().unwrap()]);
    assert_ne!(code, Some(0));
    assert!(stderr.contains("nope.html"), "stderr: {}", stderr);
}

#[test]
fn test_send_fails_fast_without_token() {
    let (tmp, config_path) = setup_test_env();
    let file = tmp.path().join("page.html");
    fs::write(&file, "<html><head><title>Page</title></head></html>").unwrap();

    let (_, stderr, code) = run_quill(&config_path, &["send", file.to_str().unwrap()]);
    assert_ne!(code, Some(0));
    assert!(
        stderr.contains("QUILLPOST_INTEGRATION_TOKEN"),
        "stderr: {}",
        stderr
    );
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_publish_proceeds_to_bookmark_after_poll_exhaustion() {
    use httpmock::prelude::*;

    let tmp = TempDir::new().unwrap();

    // A bare remote next to the working repo stands in for the hosting repo.
    let remote = tmp.path().join("remote.git");
    fs::create_dir_all(&remote).unwrap();
    git(&remote, &["init", "--bare"]);

    let work = tmp.path().join("work");
    fs::create_dir_all(&work).unwrap();
    git(&work, &["init"]);
    git(&work, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(&work, &["config", "user.email", "quill@example.org"]);
    git(&work, &["config", "user.name", "Quill"]);
    git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);

    fs::write(work.join("post.md"), "# Hello\n\nWorld").unwrap();

    let server = MockServer::start();
    let save = server.mock(|when, then| {
        when.method(POST)
            .path("/save/")
            .header("Authorization", "Bearer tok")
            .json_body_includes(
                r#"{"url": "http://127.0.0.1:9/notes/post.html", "location": "feed", "title": "Hello Again"}"#,
            );
        then.status(201)
            .json_body(serde_json::json!({"url": "https://reader.example/read/3"}));
    });

    // base_url points at a closed port, so the single poll attempt fails.
    let config_content = format!(
        r#"[site]
base_url = "http://127.0.0.1:9/notes"
remote = "origin"
branch = "main"

[deploy]
strategy = "poll"
attempts = 1
interval_secs = 0

[reader]
endpoint = "{}"
token_env = "QUILLPOST_E2E_TOKEN"
timeout_secs = 5
"#,
        server.url("/save/")
    );
    let config_path = tmp.path().join("quill.toml");
    fs::write(&config_path, config_content).unwrap();

    let output = Command::new(quill_binary())
        .arg("--config")
        .arg(&config_path)
        .args(["publish", work.join("post.md").to_str().unwrap(), "Hello Again"])
        .env("QUILLPOST_E2E_TOKEN", "tok")
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        output.status.code(),
        Some(0),
        "publish failed: stdout={} stderr={}",
        stdout,
        stderr
    );

    // Exhausting the poll is a warning, not a failure; the bookmark POST
    // still goes out.
    assert!(stderr.contains("did not return 200"), "stderr: {}", stderr);
    assert!(
        stdout.contains("bookmarked: https://reader.example/read/3"),
        "stdout: {}",
        stdout
    );
    save.assert();

    assert!(work.join("post.html").exists());

    // The commit landed on the remote before the poll even started.
    let log = Command::new("git")
        .args(["log", "-1", "--format=%s", "main"])
        .current_dir(&remote)
        .output()
        .unwrap();
    let subject = String::from_utf8_lossy(&log.stdout);
    assert_eq!(subject.trim(), "Publish: Hello Again");
}

#[test]
fn test_init_writes_config_once() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("quill.toml");

    let (stdout, _, code) = run_quill(&config_path, &["init"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("Created"));
    assert!(config_path.exists());

    let (_, stderr, code) = run_quill(&config_path, &["init"]);
    assert_ne!(code, Some(0));
    assert!(stderr.contains("already exists"), "stderr: {}", stderr);
}

#[test]
fn test_new_creates_dated_article() {
    let (tmp, config_path) = setup_test_env();
    let dir = tmp.path().join("drafts");

    let (stdout, _, code) = run_quill(
        &config_path,
        &["new", "paging-notes", "--dir", dir.to_str().unwrap()],
    );
    assert_eq!(code, Some(0));
    assert!(stdout.contains("Created"));

    let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let name = entries[0].as_ref().unwrap().file_name();
    let name = name.to_string_lossy();
    assert!(name.ends_with("-paging-notes.md"), "name: {}", name);
}
