use pretty_assertions::assert_eq;
use crate::interpreter::lexer::Lexer;
use crate::interpreter::parser::Parser;
use super::*;

fn parse(source: &str) -> Vec<Stmt> {
    let (tokens, errors) = Lexer::new(source).scan_tokens();
    assert!(errors.is_empty());

    let mut parser = Parser::new(tokens);
    let statements = parser.parse();
    assert!(!parser.had_error(), "parse errors: {:?}", parser.diagnostics());

    statements
}

fn resolve(source: &str) -> (Resolution, Vec<String>) {
    let (locals, diagnostics) = Resolver::new().resolve(&parse(source));
    (locals, diagnostics.iter().map(|diagnostic| diagnostic.to_string()).collect())
}

#[test]
fn globals_are_left_dynamic() {
    let (locals, errors) = resolve("let a = 1; print a; a = 2; func f() { ret a; }");

    assert_eq!(locals, Resolution::new());
    assert!(errors.is_empty());
}

#[test]
fn distances_count_from_the_innermost_scope() {
    // ids: a (print) = 0, b (print) = 1, a (assignment) = 2
    let (locals, errors) = resolve("{ let a = 1; { let b = 2; print a; print b; a = 3; } }");

    assert!(errors.is_empty());
    assert_eq!(locals, Resolution::from([
        (ExprId(0), 1),
        (ExprId(1), 0),
        (ExprId(2), 1),
    ]));
}

#[test]
fn parameters_and_closures() {
    // ids: x = 0, a = 1
    let (locals, _) = resolve("{ let a = 1; func f(x) { ret x + a; } }");

    assert_eq!(locals, Resolution::from([
        (ExprId(0), 0),
        (ExprId(1), 1),
    ]));
}

#[test]
fn functions_can_refer_to_themselves() {
    let (locals, errors) = resolve("{ func count(n) { if (n > 0) count(n - 1); } }");

    assert!(errors.is_empty());
    // n = 0, count = 1, n = 2
    assert_eq!(locals.get(&ExprId(1)), Some(&1));
}

#[test]
fn shadowing_picks_the_nearest_declaration() {
    // ids: a (outer print) = 0, a (inner print) = 1
    let (locals, _) = resolve("{ let a = 1; print a; { let a = 2; print a; } }");

    assert_eq!(locals, Resolution::from([
        (ExprId(0), 0),
        (ExprId(1), 0),
    ]));
}

#[test]
fn reading_a_local_in_its_own_initializer() {
    let (_, errors) = resolve("let a = 1;\n{ let a = a; }");
    assert_eq!(errors, vec!["[line 2] Error at 'a': Variable 'a' cannot be read in its own initializer"]);

    let (_, errors) = resolve("let b = b;");
    assert!(errors.is_empty());
}

#[test]
fn return_outside_a_function() {
    let (_, errors) = resolve("ret 1;\nfunc f() { ret 2; }\n{ ret; }");

    assert_eq!(errors, vec![
        "[line 1] Error at 'ret': Cannot return from top-level code",
        "[line 3] Error at 'ret': Cannot return from top-level code",
    ]);
}

#[test]
fn break_outside_a_loop() {
    let (_, errors) = resolve("while (true) { if (true) break; }\nbreak;\nwhile (true) { func f() { break; } }");

    assert_eq!(errors, vec![
        "[line 2] Error at 'break': Cannot break outside of a loop",
        "[line 3] Error at 'break': Cannot break outside of a loop",
    ]);
}

#[test]
fn errors_do_not_stop_the_pass() {
    let (locals, errors) = resolve("ret;\n{ let a = 1; print a; }");

    assert_eq!(errors.len(), 1);
    assert_eq!(locals.len(), 1);
}

#[test]
fn resolving_twice_gives_the_same_table() {
    let statements = parse("func outer(a) { func inner(b) { ret a + b; } ret inner; } { print outer(1)(2); }");

    let (first, _) = Resolver::new().resolve(&statements);
    let (second, _) = Resolver::new().resolve(&statements);

    assert_eq!(first, second);
}
