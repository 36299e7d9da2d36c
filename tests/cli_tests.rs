// End-to-end tests for the unlinked binary
// Runs offline against a fake prefix and a seeded formula cache

mod test_helpers;

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use test_helpers::TestEnvironment;

/// Write a bulk formula index where the binary looks for its cache
fn seed_cache(cache_home: &Path, formulae: serde_json::Value) {
    seed_cache_as(cache_home, "unlinked", formulae);
}

/// Write a bulk formula index under another tool's cache directory
fn seed_cache_as(cache_home: &Path, tool: &str, formulae: serde_json::Value) {
    let dir = cache_home.join(tool);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("formulae.json"), formulae.to_string()).unwrap();
}

fn run(env: &TestEnvironment, args: &[&str]) -> Output {
    let cache_home = env.prefix.join("cache");

    Command::new(env!("CARGO_BIN_EXE_unlinked"))
        .args(args)
        .arg("--offline")
        .arg("--prefix")
        .arg(&env.prefix)
        .env("XDG_CACHE_HOME", &cache_home)
        .env("NO_COLOR", "1")
        .env_remove("HOMEBREW_CELLAR")
        .env_remove("HOMEBREW_REPOSITORY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run unlinked")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn testball_env() -> TestEnvironment {
    let env = TestEnvironment::new();
    env.install("testball", "0.1", &["bin/test"]);
    seed_cache(
        &env.prefix.join("cache"),
        serde_json::json!([
            {"name": "testball", "full_name": "testball", "desc": "Some test"},
            {"name": "openssl@3", "keg_only": true}
        ]),
    );
    env
}

#[test]
fn test_lists_unlinked_formulae() {
    let env = testball_env();

    let output = run(&env, &[]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "testball\n");
    assert!(output.stderr.is_empty());
}

#[test]
fn test_keg_only_and_linked_are_hidden() {
    let env = testball_env();
    env.install("openssl@3", "3.4.0", &["bin/openssl"]);
    env.install("wget", "1.24.5", &["bin/wget"]);
    env.link("wget", "1.24.5", &["bin/wget"]);

    let output = run(&env, &[]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "testball\n");
}

#[test]
fn test_desc_and_reason_flags() {
    let env = testball_env();
    env.install("zzz-unknown", "1.0", &["bin/zzz"]);

    let output = run(&env, &["--desc", "--reason"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "testball: Some test [manually unlinked]\nzzz-unknown [formula unavailable]\n"
    );
}

#[test]
fn test_json_output() {
    let env = testball_env();
    env.external_file("bin/test");

    let output = run(&env, &["--json"]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {
                "name": "testball",
                "desc": "Some test",
                "reason": "conflict: external file (test)"
            }
        ])
    );
}

#[test]
fn test_rejects_positional_arguments() {
    let env = testball_env();

    let output = run(&env, &["testball"]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_offline_without_cache_still_reports() {
    let env = TestEnvironment::new();
    env.install("testball", "0.1", &["bin/test"]);

    let output = run(&env, &["--reason"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "testball [formula unavailable]\n");
}

#[test]
fn test_uses_its_own_cache_directory() {
    let env = TestEnvironment::new();
    env.install("foo", "1.0", &["bin/foo"]);
    env.install("baz", "1.0", &["bin/baz"]);
    env.link("baz", "1.0", &["bin/baz"]);

    let cache_home = env.prefix.join("cache");
    // Another tool's index of the same name, without conflict data
    seed_cache_as(
        &cache_home,
        "bru",
        serde_json::json!([
            {"name": "foo", "versions": {"stable": "1.0"}, "dependencies": []},
            {"name": "baz", "versions": {"stable": "1.0"}, "dependencies": []}
        ]),
    );
    seed_cache(
        &cache_home,
        serde_json::json!([
            {"name": "foo", "conflicts_with": ["baz"], "conflicts_with_reasons": [null]},
            {"name": "baz"}
        ]),
    );

    let output = run(&env, &["--reason"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "foo [declared conflict: baz]\n");

    // The other tool's index is left untouched
    let other = fs::read_to_string(cache_home.join("bru/formulae.json")).unwrap();
    assert!(other.contains("\"versions\""));
}

#[test]
fn test_ignores_other_tools_cache() {
    let env = TestEnvironment::new();
    env.install("testball", "0.1", &["bin/test"]);
    seed_cache_as(
        &env.prefix.join("cache"),
        "bru",
        serde_json::json!([{"name": "testball", "desc": "Some test"}]),
    );

    let output = run(&env, &["--reason"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "testball [formula unavailable]\n");
}
