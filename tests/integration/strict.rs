use ctxgen_cli::test_utils::TestWorkspace;
use predicates::prelude::*;

use crate::common::ctxgen;

/// Strict mode names the missing dotted reference
#[test]
fn test_strict_missing_reference() {
    let ws = TestWorkspace::new();
    let template = ws.write("email.md", "Email: {{ user.email }}");
    let data = ws.write("data.json", "{}");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .arg("--strict")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("user.email"));
}

/// `CTXGEN_STRICT` enables strict mode without the flag
#[test]
fn test_strict_from_environment() {
    let ws = TestWorkspace::new();
    let template = ws.write("email.md", "Email: {{ user.email }}");
    let data = ws.write("data.json", "{}");

    ctxgen()
        .env("CTXGEN_STRICT", "1")
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("user.email"));
}

/// Typos get a suggestion from the available variables
#[test]
fn test_strict_suggests_similar_variable() {
    let ws = TestWorkspace::new();
    let template = ws.write("typo.md", "Hi {{ nmae }}");
    let data = ws.write("data.json", r#"{"name": "Ada"}"#);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .arg("--strict")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template variable not found: 'nmae'"))
        .stderr(predicate::str::contains("Did you mean one of these?"))
        .stderr(predicate::str::contains("- name"));
}

/// Templates that only use present keys render the same in both modes
#[test]
fn test_strict_matches_lenient_on_complete_data() {
    let ws = TestWorkspace::new();
    let template = ws.write(
        "t.md",
        "{{ user.name }} ({{ user.roles | join(', ') }}){% if user.active %} active{% endif %}",
    );
    let data = ws.write(
        "data.json",
        r#"{"user": {"name": "Ada", "roles": ["admin", "dev"], "active": true}}"#,
    );
    let expected = "Ada (admin, dev) active\n";

    ctxgen().arg("-t").arg(&template).arg("-d").arg(&data).assert().success().stdout(expected);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .arg("--strict")
        .assert()
        .success()
        .stdout(expected);
}

/// `is defined` guards keep strict templates working with optional data
#[test]
fn test_strict_defined_guard() {
    let ws = TestWorkspace::new();
    let template =
        ws.write("t.md", "{% if user is defined %}{{ user.name }}{% else %}anonymous{% endif %}");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("--strict")
        .write_stdin("{}")
        .assert()
        .success()
        .stdout("anonymous\n");
}

/// Attributes of loop variables are named by their expression
#[test]
fn test_strict_loop_variable_attribute() {
    let ws = TestWorkspace::new();
    let template = ws.write("t.md", "{% for u in users %}{{ u.email }}{% endfor %}");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("--strict")
        .write_stdin(r#"{"users": [{"name": "Ada"}]}"#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template variable not found: 'u.email'"));
}
