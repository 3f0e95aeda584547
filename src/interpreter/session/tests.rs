use pretty_assertions::assert_eq;
use crate::interpreter::error::Phase;
use crate::interpreter::output::Recorder;
use super::*;

fn run(source: &str) -> (RunStatus, Recorder) {
    let mut session = Session::new(Recorder::new());
    let status = session.run(source);

    (status, session.into_output())
}

#[test]
fn runs_a_program() {
    let (status, output) = run("let greeting = 'hello';\nprint greeting + ' ' + 'world';");

    assert_eq!(status, RunStatus::Ok);
    assert!(status.is_ok());
    assert_eq!(output.printed, vec!["hello world"]);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn mixed_operand_arithmetic() {
    let (status, output) = run(r#"
        print "5" + 3;
        print 3 + "5";
        print "5" + 3 == 3 + "5";
        print "hello" - 2;
        print "ab" * 3;
        print 6 / 2;
        print "hello" / 5;
    "#);

    assert_eq!(status, RunStatus::Ok);
    assert_eq!(output.printed, vec!["53", "35", "false", "hel", "ababab", "3", "h"]);
}

#[test]
fn trimming_too_much_is_a_runtime_error() {
    let (status, output) = run("print 'hello' - 10;");

    assert_eq!(status, RunStatus::RuntimeError);
    assert_eq!(output.reported(), vec!["[line 1] Runtime error: Cannot remove 10 characters from a string of length 5"]);
}

#[test]
fn closures_observe_later_assignments() {
    let (_, output) = run("let x = 1; func f() { ret x; } x = 2; print f();");
    assert_eq!(output.printed, vec!["2"]);
}

#[test]
fn for_loop_variables_stay_inside_the_loop() {
    let (status, output) = run("for (let i = 0; i < 3; i = i + 1) { print i; }\nprint i;");

    assert_eq!(status, RunStatus::RuntimeError);
    assert_eq!(output.printed, vec!["0", "1", "2"]);
    assert_eq!(output.reported(), vec!["[line 2] Runtime error: Undefined variable 'i'"]);
}

#[test]
fn parse_errors_are_all_reported_and_nothing_runs() {
    let source = "print 'one';\nprint 'two'\nprint 'three';\nlet = 4;\nprint (5;";
    let (status, output) = run(source);

    assert_eq!(status, RunStatus::StaticError);
    assert!(output.printed.is_empty());
    assert_eq!(output.reported(), vec![
        "[line 3] Error at 'print': Expected ';' after value",
        "[line 4] Error at '=': Expected variable name after 'let'",
        "[line 5] Error at ';': Expected ')' after expression",
    ]);
}

#[test]
fn static_errors_from_every_pass() {
    let (status, output) = run("let x = 1 @;\nret 1;\nlet a = 1 +;");

    assert_eq!(status, RunStatus::StaticError);
    assert!(output.printed.is_empty());

    let phases: Vec<Phase> = output.diagnostics.iter().map(|diagnostic| diagnostic.phase).collect();
    assert_eq!(phases, vec![Phase::Lexer, Phase::Parser, Phase::Resolver]);
}

#[test]
fn resolution_errors_prevent_evaluation() {
    let (status, output) = run("print 'side effect';\n{ let a = a; }");

    assert_eq!(status, RunStatus::StaticError);
    assert!(output.printed.is_empty());
    assert_eq!(output.reported(), vec!["[line 2] Error at 'a': Variable 'a' cannot be read in its own initializer"]);
}

#[test]
fn runtime_errors_stop_the_run_but_not_the_session() {
    let mut session = Session::new(Recorder::new());

    assert_eq!(session.run("let a = 1;\nprint a;\nprint b;\nprint 'unreached';"), RunStatus::RuntimeError);
    assert_eq!(session.run("print a + 1;"), RunStatus::Ok);

    let output = session.into_output();
    assert_eq!(output.printed, vec!["1", "2"]);
    assert_eq!(output.reported(), vec!["[line 3] Runtime error: Undefined variable 'b'"]);
}

#[test]
fn globals_persist_across_runs() {
    let mut session = Session::new(Recorder::new());

    session.run("func make() { let hidden = 'kept'; func get() { ret hidden; } ret get; }");
    session.run("let get = make();");
    session.run("{ let local = 'local'; print get() + ' ' + local; }");

    assert_eq!(session.output().printed, vec!["kept local"]);
    assert!(session.output().diagnostics.is_empty());
}

#[test]
fn prompt_lines_echo_expressions() {
    let mut session = Session::new(Recorder::new());

    assert_eq!(session.run_prompt_line("1 + 2;"), RunStatus::Ok);
    assert_eq!(session.run_prompt_line("let a = 'x';"), RunStatus::Ok);
    assert_eq!(session.run_prompt_line("a * 2; a;"), RunStatus::Ok);
    assert_eq!(session.run_prompt_line("print a;"), RunStatus::Ok);

    assert_eq!(session.output().printed, vec!["3", "xx", "x"]);
}

#[test]
fn prompt_lines_recover_after_errors() {
    let mut session = Session::new(Recorder::new());

    assert_eq!(session.run_prompt_line("let = ;"), RunStatus::StaticError);
    assert_eq!(session.run_prompt_line("nope;"), RunStatus::RuntimeError);
    assert_eq!(session.run_prompt_line("'fine';"), RunStatus::Ok);

    assert_eq!(session.output().printed, vec!["fine"]);
    assert_eq!(session.output().diagnostics.len(), 2);
}

#[test]
fn printing_the_tree() {
    let mut session = Session::new(Recorder::new());

    assert_eq!(session.print_ast("let a = 1 + 2 * 3;\nif (a) print a; else { a = -a; }"), RunStatus::Ok);
    assert_eq!(session.output().printed, vec![
        "(let a (+ 1 (* 2 3)))",
        "(if a (print a) (block (expression (= a (- a)))))",
    ]);

    session.output_mut().clear();
    assert_eq!(session.print_ast("let a = ;"), RunStatus::StaticError);
    assert!(session.output().printed.is_empty());
}
