use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_chat-command");

/// Writes a small registry directory: ping, tag (alias faq), rory, notify.
fn write_registry(dir: &Path) -> PathBuf {
    let registry = dir.join("commands");
    fs::create_dir_all(&registry).expect("failed to create registry dir");
    fs::write(
        registry.join("10-ping.yaml"),
        "name: ping\ndescription: Replies with pong!\n",
    )
    .unwrap();
    let tag = serde_json::json!({
        "name": "tag",
        "aliases": ["faq"],
        "description": "Send a tag",
        "primary": {"name": "name", "description": "the tag name", "type": "string", "required": true},
        "flags": [
            {"name": "user", "aliases": ["u"], "description": "mention a user", "type": "user"}
        ]
    });
    fs::write(
        registry.join("20-tag.json"),
        serde_json::to_string_pretty(&tag).unwrap(),
    )
    .unwrap();
    fs::write(
        registry.join("30-rory.yaml"),
        "name: rory\ndescription: Gets a rory photo!\nprimary:\n  name: id\n  description: specify a Rory ID\n  type: number\n",
    )
    .unwrap();
    fs::write(
        registry.join("40-notify.yaml"),
        "name: notify\ndescription: Notify a role\nprimary:\n  name: message\n  description: the text\n  required: true\nflags:\n  - name: role\n    aliases: [r]\n    description: who to ping\n    type: role\n    required: true\n",
    )
    .unwrap();
    registry
}

fn write_guild(dir: &Path) -> PathBuf {
    let path = dir.join("guild.yaml");
    fs::write(&path, "roles:\n  - id: \"100\"\n    name: Moderators\n").unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .output()
        .expect("failed to run chat-command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_prints_arguments_as_json() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());

    let output = run(&[
        "parse",
        "--registry",
        registry.to_str().unwrap(),
        "tag welcome -u 123456789012345678",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"name": "welcome", "user": "123456789012345678"})
    );
}

#[test]
fn parse_reports_error_text_and_fails() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());

    let output = run(&[
        "parse",
        "--registry",
        registry.to_str().unwrap(),
        "rory abc",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains(":x: Invalid value of `id`"));
}

#[test]
fn parse_non_command_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());

    let output = run(&[
        "parse",
        "--registry",
        registry.to_str().unwrap(),
        "hello there",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "not a command");
}

#[test]
fn parse_resolves_roles_through_directory_as_yaml() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());
    let guild = write_guild(dir.path());

    let output = run(&[
        "parse",
        "--registry",
        registry.to_str().unwrap(),
        "--directory",
        guild.to_str().unwrap(),
        "--format",
        "yaml",
        "notify 'restart soon' -r Moderators",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_yaml::Value = serde_yaml::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["message"].as_str(), Some("restart soon"));
    assert_eq!(value["role"].as_str(), Some("100"));
}

// ---------------------------------------------------------------------------
// replay
// ---------------------------------------------------------------------------

#[test]
fn replay_keeps_input_order() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());
    let input = dir.path().join("lines.txt");
    let mut lines = Vec::new();
    for i in 0..50 {
        lines.push(format!("rory {i}"));
    }
    lines.push("say hi".to_string());
    lines.push("faq \"multi word name\"".to_string());
    lines.push("ping now".to_string());
    fs::write(&input, lines.join("\n")).unwrap();

    let output = run(&[
        "replay",
        "--registry",
        registry.to_str().unwrap(),
        input.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let results: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(results.len(), 53);
    for (i, result) in results.iter().take(50).enumerate() {
        assert_eq!(result["args"]["id"].as_f64(), Some(i as f64));
    }
    assert_eq!(results[50]["command"], serde_json::Value::Null);
    assert_eq!(results[51]["args"]["name"], "multi word name");
    assert_eq!(results[52]["error"], ":x: This command takes no arguments");
}

// ---------------------------------------------------------------------------
// validate / bundle
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_good_registry_and_rejects_collisions() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());

    let output = run(&["validate", "--structured", registry.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("4 command(s)"));

    fs::write(registry.join("50-faq.yaml"), "name: faq\n").unwrap();
    let output = run(&["validate", registry.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("duplicate command in registry: faq"));
}

#[test]
fn validate_structured_rejects_uppercase_names() {
    let dir = TempDir::new().unwrap();
    let registry = dir.path().join("commands");
    fs::create_dir_all(&registry).unwrap();
    fs::write(registry.join("ping.yaml"), "name: Ping\ndescription: pong\n").unwrap();

    assert!(run(&["validate", registry.to_str().unwrap()]).status.success());

    let output = run(&["validate", "--structured", registry.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid structured name: Ping"));
}

#[test]
fn bundle_writes_hashed_package_usable_as_registry() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());
    let bundle = dir.path().join("out").join("commands.json");

    let output = run(&[
        "bundle",
        registry.to_str().unwrap(),
        "--output",
        bundle.to_str().unwrap(),
        "--name",
        "prism",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Bundled 4 schema(s)"));

    let package: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&bundle).unwrap()).unwrap();
    assert_eq!(package["name"], "prism");
    assert_eq!(package["bundle_hash"].as_str().map(str::len), Some(64));
    assert!(package["generated_at"].as_str().is_some());

    let output = run(&[
        "parse",
        "--registry",
        bundle.to_str().unwrap(),
        "faq welcome",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

// ---------------------------------------------------------------------------
// describe / export-structured
// ---------------------------------------------------------------------------

#[test]
fn describe_lists_commands() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());

    let output = run(&["describe", "--registry", registry.to_str().unwrap()]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("ping: Replies with pong!"));
    assert!(text.contains("tag|faq [the tag name] -user [mention a user]: Send a tag"));
}

#[test]
fn export_structured_orders_required_first() {
    let dir = TempDir::new().unwrap();
    let registry = write_registry(dir.path());

    let output = run(&["export-structured", "--registry", registry.to_str().unwrap()]);
    assert!(output.status.success());

    let defs: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let notify = &defs[3];
    assert_eq!(notify["name"], "notify");
    assert_eq!(notify["options"][0]["name"], "message");
    assert_eq!(notify["options"][1]["kind"], "role");
    assert_eq!(defs[1]["options"][1]["kind"], "user");
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_dispatches_prefixed_messages() {
    let dir = TempDir::new().unwrap();
    write_registry(dir.path());
    write_guild(dir.path());
    let config = dir.path().join("bot.yaml");
    fs::write(
        &config,
        "version: \"1.0\"\nprefixes: [\"?\"]\nregistry:\n  - kind: directory\n    path: commands\ndirectory: guild.yaml\n",
    )
    .unwrap();

    let mut child = Command::new(BIN)
        .args(["simulate", "--config", config.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn chat-command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"hello\n?ping\n?notify hi -r Moderators\n?rory abc\n!ping\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let replies: Vec<String> = stdout(&output).lines().map(String::from).collect();
    assert_eq!(
        replies,
        vec![
            "{}".to_string(),
            r#"{"message":"hi","role":"100"}"#.to_string(),
            ":x: Invalid value of `id`".to_string(),
        ]
    );
}

// ---------------------------------------------------------------------------
// built-in command set
// ---------------------------------------------------------------------------

#[test]
fn commands_default_to_built_in_registry() {
    let output = run(&["describe"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    for name in ["help", "joke", "members", "modrinth", "ping", "rory", "say", "stars"] {
        assert!(text.contains(name), "missing {name}");
    }
    assert!(text.contains("tag|faq [the tag name] -user [mention a user]: Send a tag"));

    let output = run(&["parse", r"say C:\Users\me"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value, serde_json::json!({"content": r"C:\Users\me"}));
}
