use ctxgen_cli::test_utils::TestWorkspace;
use predicates::prelude::*;

use crate::common::ctxgen;

/// File output is written verbatim and confirmed on stderr
#[test]
fn test_output_file_written_verbatim() {
    let ws = TestWorkspace::new();
    let template = ws.write("t.md", "Hello {{ name }}");
    let data = ws.write("data.json", r#"{"name": "Ada"}"#);

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-d")
        .arg(&data)
        .arg("--output")
        .arg(ws.path("context.md"))
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Generated context saved to"))
        .stderr(predicate::str::contains("context.md"));

    assert_eq!(ws.read("context.md"), "Hello Ada");
}

/// An existing output file is replaced
#[test]
fn test_output_file_overwritten() {
    let ws = TestWorkspace::new();
    let template = ws.write("t.md", "new");
    ws.write("context.md", "previous content");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-o")
        .arg(ws.path("context.md"))
        .arg("-q")
        .write_stdin("{}")
        .assert()
        .success()
        .stderr("");

    assert_eq!(ws.read("context.md"), "new");
}

/// Parent directories are not created
#[test]
fn test_output_into_missing_directory_fails() {
    let ws = TestWorkspace::new();
    let template = ws.write("t.md", "text");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-o")
        .arg(ws.path("missing/dir/context.md"))
        .write_stdin("{}")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to write output to"));

    assert!(!ws.exists("missing"));
}

/// A failed render leaves an existing output file untouched
#[test]
fn test_output_untouched_on_render_failure() {
    let ws = TestWorkspace::new();
    let template = ws.write("t.md", "{{ missing }}");
    ws.write("context.md", "keep me");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-o")
        .arg(ws.path("context.md"))
        .arg("--strict")
        .write_stdin("{}")
        .assert()
        .code(1);

    assert_eq!(ws.read("context.md"), "keep me");
}

/// Verbose logging goes to stderr, never stdout
#[test]
fn test_verbose_logs_stay_off_stdout() {
    let ws = TestWorkspace::new();
    let template = ws.write("t.md", "{{ x }}");

    ctxgen()
        .arg("-t")
        .arg(&template)
        .arg("-v")
        .write_stdin(r#"{"x": 1}"#)
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("DEBUG"));
}
