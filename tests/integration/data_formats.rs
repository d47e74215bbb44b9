use ctxgen_cli::test_utils::TestWorkspace;
use predicates::prelude::*;

use crate::common::ctxgen;

fn greeting(ws: &TestWorkspace) -> std::path::PathBuf {
    ws.write("greet.md", "{{ greeting }}, {{ name }}!")
}

/// JSON data from standard input when `--data` is omitted
#[test]
fn test_json_from_stdin() {
    let ws = TestWorkspace::new();
    let template = greeting(&ws);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .write_stdin(r#"{"greeting": "Hi", "name": "Ada"}"#)
        .assert()
        .success()
        .stdout("Hi, Ada!\n");
}

/// `-` is an explicit request for standard input
#[test]
fn test_yaml_from_stdin_dash() {
    let ws = TestWorkspace::new();
    let template = greeting(&ws);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg("-")
        .write_stdin("greeting: Hello\nname: Grace\n")
        .assert()
        .success()
        .stdout("Hello, Grace!\n");
}

/// Non-JSON text falls back to YAML regardless of the file extension
#[test]
fn test_yaml_in_json_named_file() {
    let ws = TestWorkspace::new();
    let template = greeting(&ws);
    let data = ws.write("data.json", "greeting: Hey\nname: Linus\n");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .success()
        .stdout("Hey, Linus!\n");
}

/// Empty data binds no variables
#[test]
fn test_empty_data_is_empty_context() {
    let ws = TestWorkspace::new();
    let template = ws.write("t.md", "[{{ anything }}]");

    ctxgen().arg("-t").arg(&template).write_stdin("").assert().success().stdout("[]\n");
}

/// Data that is neither JSON nor YAML is fatal
#[test]
fn test_invalid_data() {
    let ws = TestWorkspace::new();
    let template = greeting(&ws);
    let data = ws.write("data.txt", "{ \"unterminated\": [1, 2\nkey: : :\n");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Unable to parse data from"))
        .stderr(predicate::str::contains("as JSON or YAML"));
}

/// A top-level list cannot be bound as variables
#[test]
fn test_top_level_array_rejected() {
    let ws = TestWorkspace::new();
    let template = greeting(&ws);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .write_stdin("[1, 2, 3]")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("found an array"));
}

/// A missing data file is reported by kind and path
#[test]
fn test_missing_data_file() {
    let ws = TestWorkspace::new();
    let template = greeting(&ws);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(ws.path("missing.yaml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Data file '"))
        .stderr(predicate::str::contains("missing.yaml' not found"));
}

/// Mapping key order from the data is kept when iterating
#[test]
fn test_key_order_preserved() {
    let ws = TestWorkspace::new();
    let template = ws.write("t.md", "{% for k, v in items | items %}{{ k }}={{ v }};{% endfor %}");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .write_stdin(r#"{"items": {"zeta": 1, "alpha": 2, "mid": 3}}"#)
        .assert()
        .success()
        .stdout("zeta=1;alpha=2;mid=3;\n");
}
