//! Integration tests for commands, operators and variables

#[path = "common/mod.rs"]
mod common;
#[allow(unused_imports)]
use common::{eval, eval_exit_code, eval_with, Executor};

#[test]
fn test_simple_command() {
    assert_eq!(eval("echo hello world").unwrap(), "hello world\n");
}

#[test]
fn test_sequence() {
    assert_eq!(eval("echo a; echo b\necho c").unwrap(), "a\nb\nc\n");
}

#[test]
fn test_comment_ignored() {
    assert_eq!(eval("echo hi # ignored").unwrap(), "hi\n");
    assert_eq!(eval("# whole line\necho after").unwrap(), "after\n");
}

#[test]
fn test_pipe_basic() {
    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, "echo hi | wc -c").unwrap();
    assert_eq!(status, 0);
    assert_eq!(out.trim(), "3");
}

#[test]
fn test_pipe_chained() {
    let out = eval("printf 'b\\na\\nc\\n' | sort | head -n 1").unwrap();
    assert_eq!(out, "a\n");
}

#[test]
fn test_pipe_without_spaces() {
    assert_eq!(eval("echo x|cat").unwrap(), "x\n");
}

#[test]
fn test_pipe_status_is_right_side() {
    assert_eq!(eval_exit_code("echo hi | false"), 1);
}

#[test]
fn test_pipe_left_failure_skips_right() {
    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, "sh -c 'exit 3' | echo right").unwrap();
    assert_eq!(status, 3);
    assert_eq!(out, "");
}

#[test]
fn test_and_short_circuit() {
    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, "false && echo hi").unwrap();
    assert_eq!(status, 1);
    assert_eq!(out, "");
}

#[test]
fn test_and_runs_right() {
    assert_eq!(eval("true && echo yes").unwrap(), "yes\n");
}

#[test]
fn test_or_short_circuit() {
    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, "true || echo hi").unwrap();
    assert_eq!(status, 0);
    assert_eq!(out, "");
}

#[test]
fn test_or_runs_right() {
    assert_eq!(eval("false || echo fallback").unwrap(), "fallback\n");
}

#[test]
fn test_chain_nests_to_the_right() {
    assert_eq!(eval("false && echo no || echo yes").unwrap(), "");
    assert_eq!(eval("true && false || echo recovered").unwrap(), "recovered\n");
}

#[test]
fn test_single_quotes_are_literal() {
    assert_eq!(eval("echo '$HOME'").unwrap(), "$HOME\n");
}

#[test]
fn test_double_quotes_expand() {
    assert_eq!(eval("X=5; echo \"v=$X\"").unwrap(), "v=5\n");
}

#[test]
fn test_double_quotes_keep_spaces() {
    assert_eq!(eval("printf '[%s]' \"a  b\"").unwrap(), "[a  b]");
}

#[test]
fn test_unset_variable_is_empty() {
    assert_eq!(eval("echo \"[$TURTLE_TEST_UNSET_Y]\"").unwrap(), "[]\n");
}

#[test]
fn test_variable_concatenation() {
    assert_eq!(eval("D=/usr; echo $D/bin").unwrap(), "/usr/bin\n");
}

#[test]
fn test_assignment_persists() {
    let mut executor = Executor::new();
    let (status, out) = eval_with(&mut executor, "A=1 B=2").unwrap();
    assert_eq!(status, 0);
    assert_eq!(out, "");
    assert_eq!(executor.last_pid(), None);
    assert_eq!(executor.var("A").as_deref(), Some("1"));
    assert_eq!(executor.var("B").as_deref(), Some("2"));
}

#[test]
fn test_shell_variables_not_exported() {
    assert_eq!(
        eval("TURTLE_T_LOCAL=1; printenv TURTLE_T_LOCAL || echo unset").unwrap(),
        "unset\n"
    );
}

#[test]
fn test_prefix_assignment_exported() {
    assert_eq!(eval("TURTLE_T_OV=yes printenv TURTLE_T_OV").unwrap(), "yes\n");
}

#[test]
fn test_prefix_assignment_not_persisted() {
    let mut executor = Executor::new();
    let (_, out) = eval_with(&mut executor, "TURTLE_T_TMP=1 true; echo \"[$TURTLE_T_TMP]\"").unwrap();
    assert_eq!(out, "[]\n");
    assert_eq!(executor.var("TURTLE_T_TMP"), None);
}

#[test]
fn test_prefix_assignment_visible_to_own_words() {
    assert_eq!(eval("TURTLE_T_W=7 echo $TURTLE_T_W").unwrap(), "7\n");
}

#[test]
fn test_assignment_before_operator_is_kept() {
    assert_eq!(eval("TURTLE_T_OP=1 && echo $TURTLE_T_OP").unwrap(), "1\n");
}

#[test]
fn test_last_status_var() {
    assert_eq!(eval("false; echo $?").unwrap(), "1\n");
    assert_eq!(eval("true; echo $?").unwrap(), "0\n");
}

#[test]
fn test_last_pid_var() {
    let mut executor = Executor::new();
    let (_, out) = eval_with(&mut executor, "true; echo $!").unwrap();
    let pid: u32 = out.trim().parse().unwrap();
    assert!(pid > 0);
    assert_ne!(Some(pid), executor.last_pid());
}

#[test]
fn test_command_not_found() {
    assert_eq!(eval_exit_code("turtle-test-missing-binary"), 127);
}

#[test]
fn test_not_found_in_chain() {
    assert_eq!(
        eval("turtle-test-missing-binary || echo handled").unwrap(),
        "handled\n"
    );
}

#[test]
fn test_literal_close_paren() {
    assert_eq!(eval("echo a)").unwrap(), "a)\n");
}

#[test]
fn test_parse_error_is_reported() {
    let err = eval("echo a &").unwrap_err();
    assert!(err.contains("not supported"));
}

#[test]
fn test_parse_error_sets_last_status() {
    let mut executor = Executor::new();
    assert!(eval_with(&mut executor, "true; echo a &").is_err());
    assert_eq!(executor.last_status(), 2);
    let (_, out) = eval_with(&mut executor, "echo $?").unwrap();
    assert_eq!(out, "2\n");
}
