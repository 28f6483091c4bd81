//! Integration tests for the `.` builtin and Executor::source_file

#[path = "common/mod.rs"]
mod common;
#[allow(unused_imports)]
use common::{eval, eval_exit_code, eval_with, write_script, Executor};

#[test]
fn test_source_runs_in_current_shell() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "vars.tt", "GREETING=hello\n");

    let mut executor = Executor::new();
    let input = format!(". {}; echo $GREETING", script.display());
    let (status, out) = eval_with(&mut executor, &input).unwrap();
    assert_eq!(status, 0);
    assert_eq!(out, "hello\n");
    assert_eq!(executor.var("GREETING").as_deref(), Some("hello"));
}

#[test]
fn test_source_positional_params() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "args.tt", "echo \"$1-$2\"\necho $0\n");

    let input = format!(". {} one two", script.display());
    let out = eval(&input).unwrap();
    assert_eq!(out, format!("one-two\n{}\n", script.display()));
}

#[test]
fn test_source_params_restored() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "args.tt", "true\n");

    let mut executor = Executor::new();
    executor.set_var("1", "outer");
    let input = format!(". {} inner", script.display());
    eval_with(&mut executor, &input).unwrap();
    assert_eq!(executor.var("1").as_deref(), Some("outer"));
    assert_eq!(executor.var("0"), None);
}

#[test]
fn test_source_prefix_assignment_scoped() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "show.tt", "echo $TURTLE_T_MODE\n");

    let mut executor = Executor::new();
    let input = format!("TURTLE_T_MODE=fast . {}", script.display());
    let (_, out) = eval_with(&mut executor, &input).unwrap();
    assert_eq!(out, "fast\n");
    assert_eq!(executor.var("TURTLE_T_MODE"), None);
}

#[test]
fn test_source_stops_at_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "fail.tt",
        "echo before\nsh -c 'exit 7'\necho after\n",
    );

    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, &format!(". {}", script.display())).unwrap();
    assert_eq!(status, 7);
    assert_eq!(out, "before\n");
}

#[test]
fn test_source_substitution_failure_stops_script() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "abort.tt", "echo $(false)\necho after\n");

    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, &format!(". {}", script.display())).unwrap();
    assert_eq!(status, 1);
    assert_eq!(out, "");
}

#[test]
fn test_source_missing_filename() {
    assert_eq!(eval_exit_code("."), 2);
}

#[test]
fn test_source_unreadable_file() {
    assert_eq!(eval_exit_code(". /nonexistent/turtle/script.tt"), 1);
}

#[test]
fn test_source_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "bad.tt", "echo ok\necho 'unterminated\n");

    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, &format!(". {}", script.display())).unwrap();
    assert_eq!(status, 2);
    assert_eq!(out, "ok\n");
}

#[test]
fn test_source_runs_commands_before_late_syntax_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "late.tt",
        "echo first\necho second\necho a &\necho never\n",
    );

    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, &format!(". {}", script.display())).unwrap();
    assert_eq!(status, 2);
    assert_eq!(out, "first\nsecond\n");
    assert_eq!(executor.last_status(), 2);
}

#[test]
fn test_source_then_or() {
    assert_eq!(
        eval(". /nonexistent/turtle/script.tt || echo fallback").unwrap(),
        "fallback\n"
    );
}

#[test]
fn test_source_into_pipe() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "emit.tt", "echo one\necho two\n");

    let out = eval(&format!(". {} | wc -l", script.display())).unwrap();
    assert_eq!(out.trim(), "2");
}

#[test]
fn test_source_file_api() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "api.tt", "RESULT=$1\n");

    let mut executor = Executor::new();
    let status = executor.source_file(&script, &["done".to_string()]);
    assert_eq!(status, 0);
    // Variables set by the script outlive it; positional params do not
    assert_eq!(executor.var("RESULT").as_deref(), Some("done"));
    assert_eq!(executor.var("1"), None);
}

#[test]
fn test_nested_source() {
    let dir = tempfile::tempdir().unwrap();
    let inner = write_script(dir.path(), "inner.tt", "echo inner $1\n");
    let outer = write_script(
        dir.path(),
        "outer.tt",
        &format!("echo outer $1\n. {} nested\necho outer $1\n", inner.display()),
    );

    let out = eval(&format!(". {} top", outer.display())).unwrap();
    assert_eq!(out, "outer top\ninner nested\nouter top\n");
}
