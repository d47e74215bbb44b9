use ctxgen_cli::test_utils::TestWorkspace;
use predicates::prelude::*;

use crate::common::ctxgen;

/// The canonical substitution example
#[test]
fn test_render_hello_example() {
    let ws = TestWorkspace::new();
    let template = ws.write("hello.md", "Hello {{ name }}, you are {{ age }} years old.");
    let data = ws.write("data.json", r#"{"name": "Ada", "age": 30}"#);

    ctxgen()
        .arg("--template")
        .arg(&template)
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout("Hello Ada, you are 30 years old.\n")
        .stderr("");
}

/// Missing values render as empty text by default
#[test]
fn test_render_lenient_missing_value() {
    let ws = TestWorkspace::new();
    let template = ws.write("email.md", "Email: {{ user.email }}");
    let data = ws.write("data.json", "{}");

    ctxgen().arg("-t").arg(&template).arg("-d").arg(&data).assert().success().stdout("Email: \n");
}

/// Filters, loops and tests all absorb missing values
#[test]
fn test_render_lenient_absorbs_everywhere() {
    let ws = TestWorkspace::new();
    let template = ws.write(
        "lenient.md",
        "count={{ missing | length }}\n\
         loop=[{% for x in missing %}never{% endfor %}]\n\
         role={{ 'admin' if user.profile.admin else 'guest' }}\n\
         json={{ absent | tojson }}\n",
    );
    let data = ws.write("data.json", "{}");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .success()
        .stdout("count=0\nloop=[]\nrole=guest\njson=null\n");
}

/// Loops and block tags do not leave blank lines behind
#[test]
fn test_render_loop_whitespace() {
    let ws = TestWorkspace::new();
    let template = ws.write(
        "list.md",
        "# Tasks\n{% for task in tasks %}\n- {{ task.title }}{{ ' (done)' if task.done else '' }}\n{% endfor %}\n",
    );
    let data = ws.write(
        "data.yaml",
        "tasks:\n  - title: Write docs\n    done: true\n  - title: Ship\n    done: false\n",
    );

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .success()
        .stdout("# Tasks\n- Write docs (done)\n- Ship\n\n");
}

/// Includes resolve relative to the main template's directory
#[test]
fn test_render_include_sibling() {
    let ws = TestWorkspace::new();
    ws.write("templates/header.md", "## {{ title }}\n");
    let template = ws.write("templates/main.md", "{% include 'header.md' %}\n\nBody");
    let data = ws.write("data.json", r#"{"title": "Report"}"#);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .success()
        .stdout("## Report\nBody\n");
}

/// `tojson` output is valid JSON equal to the input data
#[test]
fn test_render_tojson_round_trip() {
    let ws = TestWorkspace::new();
    let template = ws.write("dump.json", "{{ config | tojson }}");
    let data = ws.write(
        "data.json",
        r#"{"config": {"name": "ctx", "tags": ["a", "ü"], "limits": {"max": 3, "ratio": 0.5}, "note": "<b>&</b>"}}"#,
    );

    let output = ctxgen().arg("-t").arg(&template).arg("-d").arg(&data).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let decoded: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        decoded,
        serde_json::json!({"name": "ctx", "tags": ["a", "ü"], "limits": {"max": 3, "ratio": 0.5}, "note": "<b>&</b>"})
    );
    assert!(stdout.contains("<b>&</b>"));
    assert!(stdout.starts_with("{\n  \"name\": \"ctx\","));
}

/// Template syntax errors are fatal and point at the template
#[test]
fn test_render_syntax_error() {
    let ws = TestWorkspace::new();
    let template = ws.write("broken.md", "Hello\n{% if name %}\nno endif\n");
    let data = ws.write("data.json", r#"{"name": "Ada"}"#);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Template syntax error"))
        .stderr(predicate::str::contains("broken.md"));
}

/// A missing include is reported by name
#[test]
fn test_render_missing_include() {
    let ws = TestWorkspace::new();
    let template = ws.write("main.md", "{% include 'partials/absent.md' %}");
    let data = ws.write("data.json", "{}");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template 'partials/absent.md' not found"));
}

/// The template is checked before any data is read
#[test]
fn test_render_missing_template() {
    let ws = TestWorkspace::new();

    ctxgen()
        .arg("-t")
        .arg(ws.path("nope.md"))
        .write_stdin("{}")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("Template file '"))
        .stderr(predicate::str::contains("nope.md' not found"));
}

/// Usage errors keep clap's exit status
#[test]
fn test_render_requires_template_flag() {
    ctxgen().assert().code(2).stderr(predicate::str::contains("--template"));
}
