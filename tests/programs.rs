use std::path::PathBuf;

use rstest::rstest;

use imp::{
    evaluate, parse_program, run, tokenize_file, tokenize_string, Environment, Error, EvalError,
    LexError,
};

fn run_source(source: &str) -> Result<Environment, Error> {
    let mut env = Environment::new();
    run(source, &mut env)?;
    Ok(env)
}

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[rstest]
#[case("x := 2 + 3 * 4", &[("x", 14)])]
#[case("x := (2 + 3) * 4", &[("x", 20)])]
#[case("x := 10 - 3 - 2", &[("x", 5)])]
#[case("x := 20 / 2 / 5", &[("x", 2)])]
#[case("x := 0 - 7 / 2", &[("x", -3)])]
#[case("y := x + 1", &[("y", 1)])]
#[case("x := 1; x := x + 1; x := x * 10", &[("x", 20)])]
#[case("x := 0; repeat 5 times x := x + 2 end", &[("x", 10)])]
#[case("x := 3; repeat 0 times x := 0 end", &[("x", 3)])]
#[case("if 1 < 2 then a := 1 else b := 1 end", &[("a", 1)])]
#[case("if 1 > 2 then a := 1 else b := 1 end", &[("b", 1)])]
#[case("if 1 > 2 then a := 1 end", &[])]
#[case("n := 4; while n > 0 do n := n - 1; s := s + n end", &[("n", 0), ("s", 6)])]
#[case("if not 1 = 2 and 2 = 2 then x := 1 end", &[("x", 1)])]
#[case("if 1 = 2 and 2 = 3 or 3 = 3 then x := 1 end", &[("x", 1)])]
#[case("if (1 < 2 or 1 = 1) and 2 != 2 then x := 1 else x := 2 end", &[("x", 2)])]
#[case("if (1 + 1) * 2 >= 4 then x := 1 end", &[("x", 1)])]
#[case("# comment only line\nx := 1 # trailing\n", &[("x", 1)])]
fn test_program_bindings(#[case] source: &str, #[case] expected: &[(&str, i64)]) {
    let env = run_source(source).unwrap();
    assert_eq!(env.bindings(), expected.to_vec(), "{source}");
}

#[rstest]
#[case("")]
#[case("x :=")]
#[case("x := 1;")]
#[case("x := 1 +")]
#[case("x = 1")]
#[case("1 := x")]
#[case("x := (1 + 2")]
#[case("if 1 < 2 then x := 1")]
#[case("if 1 then x := 1 end")]
#[case("while 1 < 2 do end")]
#[case("repeat n times x := 1 end")]
#[case("repeat 2 + 1 times x := 1 end")]
#[case("x := 1 y := 2")]
fn test_syntax_errors(#[case] source: &str) {
    assert!(matches!(run_source(source), Err(Error::Syntax)), "{source}");
}

#[rstest]
#[case("x := 2 @ 3", '@')]
#[case("x := 1;\ny := $", '$')]
#[case("x := 1 ! 2", '!')]
fn test_illegal_characters(#[case] source: &str, #[case] character: char) {
    match run_source(source) {
        Err(Error::Lex(LexError::IllegalCharacter { character: found, .. })) => {
            assert_eq!(found, character)
        }
        other => panic!("expected a lex error for {source:?}, got {other:?}"),
    }
}

#[rstest]
#[case("x := 1 / 0", EvalError::DivisionByZero)]
#[case("x := 1; y := x / (x - 1)", EvalError::DivisionByZero)]
#[case("if 1 / 0 = 1 or 1 = 1 then x := 1 end", EvalError::DivisionByZero)]
fn test_runtime_faults(#[case] source: &str, #[case] expected: EvalError) {
    match run_source(source) {
        Err(Error::Eval(e)) => assert_eq!(e, expected),
        other => panic!("expected an evaluation fault for {source:?}, got {other:?}"),
    }
}

#[test]
fn test_fault_keeps_earlier_assignments() {
    let mut env = Environment::new();
    let result = run("x := 5; y := x / 0; z := 1", &mut env);
    assert!(matches!(result, Err(Error::Eval(EvalError::DivisionByZero))));
    assert_eq!(env.bindings(), vec![("x", 5)]);
}

#[test]
fn test_overflow_is_reported() {
    let result = run_source("x := 9223372036854775807 + 1");
    assert!(matches!(result, Err(Error::Eval(EvalError::Overflow { .. }))));
}

#[test]
fn test_oversized_literal_is_a_lex_error() {
    let result = run_source("x := 9223372036854775808");
    assert!(matches!(result, Err(Error::Lex(_))));
}

#[test]
fn test_environment_carries_over_between_runs() {
    let mut env = Environment::from([("x", 2)]);
    run("x := x * 3", &mut env).unwrap();
    run("y := x + 1", &mut env).unwrap();
    assert_eq!(env.bindings(), vec![("x", 6), ("y", 7)]);
}

#[rstest]
#[case("x := 1")]
#[case("x := 1; y := 2; z := x + y")]
#[case("if x < 1 then x := 1 else x := 2 end")]
#[case("while x < 3 do x := x + 1 end")]
#[case("repeat 2 times x := x + 1; y := y + x end")]
fn test_dropping_the_last_token_is_a_syntax_error(#[case] source: &str) {
    let tokens = tokenize_string(source).unwrap();
    assert!(parse_program(&tokens).is_ok());
    let truncated = &tokens[..tokens.len() - 1];
    assert!(matches!(parse_program(truncated), Err(Error::Syntax)), "{source}");
}

#[rstest]
#[case("factorial.imp", &[("n", 0), ("p", 3628800)])]
#[case("fibonacci.imp", &[("a", 6765), ("b", 10946), ("t", 10946)])]
#[case("gcd.imp", &[("g", 21), ("x", 21), ("y", 21)])]
#[case("primes.imp", &[("count", 15), ("d", 8), ("n", 50), ("prime", 0)])]
fn test_demo_programs(#[case] name: &str, #[case] expected: &[(&str, i64)]) {
    let tokens = tokenize_file(demo(name)).unwrap();
    let program = parse_program(&tokens).unwrap();
    let mut env = Environment::new();
    evaluate(&program, &mut env).unwrap();
    assert_eq!(env.bindings(), expected.to_vec(), "{name}");
}

#[test]
fn test_missing_file_is_an_io_error() {
    let result = tokenize_file(demo("does_not_exist.imp"));
    assert!(matches!(result, Err(Error::Io { .. })));
}
