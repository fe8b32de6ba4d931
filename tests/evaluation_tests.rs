// Evaluation tests against a bootstrapped interpreter, stacks are written top first.

use brief::lang::compilation::parse_literal;
use brief::runtime::built_ins::new_interpreter;
use brief::runtime::config::Config;
use brief::runtime::data_structures::value::Value;
use brief::runtime::error::{ErrorKind, ScriptError};
use brief::runtime::host::MemoryHost;
use brief::runtime::interpreter::brief_interpreter::BriefInterpreter;
use brief::runtime::interpreter::{CodeManagement, InterpreterStack, with_evaluation_stack};
use pretty_assertions::assert_eq;
use std::rc::Rc;
use test_case::test_case;

fn interpreter_with(config: Config, host: Rc<MemoryHost>) -> BriefInterpreter {
    new_interpreter(config, host).expect("bootstrap failed")
}

fn interpreter() -> BriefInterpreter {
    interpreter_with(Config::default(), Rc::new(MemoryHost::new()))
}

fn source_stack(interpreter: &BriefInterpreter) -> Vec<String> {
    interpreter
        .stack_top_first()
        .iter()
        .map(Value::to_source)
        .collect()
}

/// Run on an evaluation thread so deep recursion has the stack it needs.
fn eval(source: &str) -> Vec<String> {
    with_evaluation_stack(Config::default().stack_size, || {
        let mut interpreter = interpreter();

        interpreter
            .process_source("<test>", source)
            .expect("evaluation failed");

        source_stack(&interpreter)
    })
    .expect("evaluation thread failed")
}

fn eval_error(source: &str) -> (ScriptError, Vec<String>) {
    let mut interpreter = interpreter();

    let error = interpreter
        .process_source("<test>", source)
        .expect_err("evaluation should have failed");

    (error, source_stack(&interpreter))
}

#[test_case("42", &["42"]; "number")]
#[test_case("3 4 swap", &["3", "4"]; "swap")]
#[test_case("5 factorial", &["120"]; "factorial")]
#[test_case("[ dup * ] \"square\" define 6 square", &["36"]; "define then use")]
#[test_case("[ 1 ] \"dup\" define 5 square", &["25"]; "redefinition leaves compiled words alone")]
#[test_case("[ drop ] \"swap\" define 1 2 over", &["1", "2", "1"]; "prelude keeps its swap")]
#[test_case("[ 1 ] \"dup\" define \"5 dup\" eval", &["1", "5"]; "new code sees the redefinition")]
#[test_case("3 dup", &["3", "3"]; "dup")]
#[test_case("1 2 drop", &["1"]; "drop")]
#[test_case("4 [ 10 ] dip", &["4", "10"]; "dip")]
#[test_case("1 2 over", &["1", "2", "1"]; "over")]
#[test_case("1 2 3 rot", &["1", "3", "2"]; "rot")]
#[test_case("1 2 3 -rot", &["2", "1", "3"]; "minus rot")]
#[test_case("1 2 nip", &["2"]; "nip")]
#[test_case("true [ 1 ] [ 2 ] if", &["1"]; "if true")]
#[test_case("false [ 1 ] [ 2 ] if", &["2"]; "if false")]
#[test_case("0 [ 1 ] unless", &["1"]; "unless")]
#[test_case("-5 abs", &["5"]; "abs of negative")]
#[test_case("3 abs", &["3"]; "abs of positive")]
#[test_case("5 [ 1 + ] [ 2 * ] bi", &["10", "6"]; "bi")]
#[test_case("1 2 [ 10 * ] bi@", &["20", "10"]; "bi at")]
#[test_case("2 3 [ 0 > ] both?", &["true"]; "both")]
#[test_case("-2 3 [ 0 > ] either?", &["true"]; "either")]
fn combinators(source: &str, expected: &[&str]) {
    assert_eq!(eval(source), expected);
}

#[test_case("1 2 +", &["3"]; "add")]
#[test_case("5 7 -", &["-2"]; "subtract")]
#[test_case("6 7 *", &["42"]; "multiply")]
#[test_case("6 2 /", &["3"]; "exact division")]
#[test_case("7 2 /", &["3.5"]; "inexact division")]
#[test_case("7 2 mod", &["1"]; "modulo")]
#[test_case("1.5 2 *", &["3.0"]; "float multiply")]
#[test_case("0x10 0b11 +", &["19"]; "hex and binary")]
#[test_case("1e3 1 +", &["1001.0"]; "exponent")]
#[test_case(
    "10000000000.0 10000000000.0 * [ ] cons",
    &["[ 100000000000000000000.0 ]"];
    "large floats print without an exponent"
)]
#[test_case("\"a\" \"b\" +", &["\"ab\""]; "string join")]
#[test_case("\"n\" 1 +", &["\"n1\""]; "string and number")]
#[test_case("2 3 <", &["true"]; "less")]
#[test_case("2 2.0 =", &["true"]; "equal across types")]
#[test_case("3 3 >=", &["true"]; "greater or equal")]
#[test_case("\"a\" \"b\" >", &["false"]; "string compare")]
#[test_case("true false and", &["false"]; "and")]
#[test_case("true false or", &["true"]; "or")]
#[test_case("true true xor", &["false"]; "xor")]
#[test_case("0 not", &["true"]; "not")]
fn math_and_logic(source: &str, expected: &[&str]) {
    assert_eq!(eval(source), expected);
}

#[test_case("[ 1 2 3 ] length", &["3"]; "length of list")]
#[test_case("\"four\" length", &["4"]; "length of string")]
#[test_case("1 [ 2 3 ] cons", &["[ 1 2 3 ]"]; "cons")]
#[test_case("[ 1 2 3 ] snoc", &["[ 2 3 ]", "1"]; "snoc")]
#[test_case("5 1 range", &["[ 1 2 3 4 5 ]"]; "range")]
#[test_case("1 5 range", &["[ ]"]; "empty range")]
#[test_case("[ 1 2 3 ] [ square ] map", &["[ 1 4 9 ]"]; "map")]
#[test_case("[ 1 2 3 4 ] [ 2 mod 0 = ] filter", &["[ 2 4 ]"]; "filter")]
#[test_case("[ 1 2 3 4 ] 0 [ + ] fold", &["10"]; "fold")]
#[test_case("[ 1 2 3 4 ] sum", &["10"]; "sum")]
#[test_case("[ 1 2 3 4 ] prod", &["24"]; "prod")]
#[test_case("[ 1 2 3 4 ] average", &["2.5"]; "average")]
#[test_case("[ ] [ ] cons", &["[ [ ] ]"]; "cons a list")]
#[test_case("[1 2]length", &["2"]; "brackets split off adjacent text")]
#[test_case("\"a \\\"b\\\" c\" length", &["7"]; "string with spaces and escaped quotes")]
fn lists(source: &str, expected: &[&str]) {
    assert_eq!(eval(source), expected);
}

#[test_case("\"1 2 +\" eval", &["3"]; "eval string")]
#[test_case("[ 1 2 + ] eval", &["3"]; "eval list")]
#[test_case("1 frobnicate 2", &["2", "1"]; "unknown words do nothing")]
#[test_case("[ 2 * ] \"double\" define 3 double", &["3"]; "words defined later in the same text stay unknown")]
#[test_case("words length 0 >", &["true"]; "words")]
#[test_case(
    "[ dup 0 > [ 1 - \"countdown\" eval ] when ] \"countdown\" define 3 \"countdown\" eval",
    &["0"];
    "recursion"
)]
#[test_case(
    "[ dup 0 > [ 1 - \"countdown\" eval ] when ] \"countdown\" define 1000 \"countdown\" eval",
    &["0"];
    "deep recursion"
)]
#[test_case("[ 1 ] \"one\" define [ 2 ] \"one\" define \"one\" eval", &["2"]; "redefinition wins")]
fn words_and_code(source: &str, expected: &[&str]) {
    assert_eq!(eval(source), expected);
}

#[test]
fn empty_dictionary_treats_everything_as_data_or_unknown() {
    let mut interpreter = BriefInterpreter::new(Config::default(), Rc::new(MemoryHost::new()));

    interpreter
        .process_source("<test>", "3 4 +")
        .expect("evaluation failed");

    assert_eq!(source_stack(&interpreter), vec!["4", "3"]);
}

#[test]
fn underflow_leaves_the_stack_untouched() {
    let (error, stack) = eval_error("1 +");

    assert_eq!(
        error.kind(),
        &ErrorKind::StackUnderflow {
            word: "+".to_string(),
            needed: 2,
            found: 1
        }
    );
    assert_eq!(stack, vec!["1"]);
    assert!(error.call_stack().is_some());
}

#[test_case("1 0 /", ErrorKind::DivisionByZero; "divide by zero")]
#[test_case("1 0 mod", ErrorKind::DivisionByZero; "mod by zero")]
#[test_case("4 snoc", ErrorKind::TypeMismatch {
    expected: "list",
    found: "int 4".to_string()
}; "snoc of a number")]
#[test_case("\"x\" use", ErrorKind::UnknownCode("x".to_string()); "use of missing code")]
#[test_case("-9223372036854775808 -1 /", ErrorKind::Message(
    "Integer overflow in -9223372036854775808 and -1.".to_string()
); "division overflow")]
#[test_case("[ 1 ] \"a b\" define", ErrorKind::InvalidName {
    name: "a b".to_string(),
    reason: "the name contains whitespace or brackets"
}; "define with a bad name")]
fn errors(source: &str, expected: ErrorKind) {
    let (error, _) = eval_error(source);

    assert_eq!(error.kind(), &expected);
}

#[test]
fn type_errors_are_reported() {
    let (error, _) = eval_error("\"a\" 1 -");

    assert!(matches!(error.kind(), ErrorKind::TypeMismatch { .. }));

    let (error, _) = eval_error("[ ] snoc");

    assert!(matches!(
        error.kind(),
        ErrorKind::TypeMismatch {
            expected: "non-empty list",
            ..
        }
    ));
}

#[test]
fn runaway_recursion_is_stopped() {
    let config = Config::default().with_max_call_depth(50);
    let mut interpreter = interpreter_with(config, Rc::new(MemoryHost::new()));

    let error = interpreter
        .process_source("<test>", "[ \"forever\" eval ] \"forever\" define \"forever\" eval")
        .expect_err("recursion should have been stopped");

    assert_eq!(error.kind(), &ErrorKind::CallDepthExceeded(50));
}

#[test]
fn lexer_and_parser_problems_do_not_stop_evaluation() {
    let mut interpreter = interpreter();

    interpreter
        .process_source("<test>", "1 ] 2 \"open")
        .expect("evaluation failed");

    let kinds: Vec<ErrorKind> = interpreter
        .take_diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.kind().clone())
        .collect();

    assert_eq!(source_stack(&interpreter), vec!["2", "1"]);
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&ErrorKind::UnbalancedClose));
    assert!(
        kinds
            .iter()
            .any(|kind| matches!(kind, ErrorKind::UnterminatedString(_)))
    );
}

#[test]
fn unterminated_lists_are_accepted() {
    assert_eq!(eval("[ 1 2"), vec!["[ 1 2 ]"]);
}

#[test]
fn host_words_go_through_the_host() {
    let host = Rc::new(MemoryHost::new().with_source("lib", "[ 2 * ] \"double\" define"));
    let mut interpreter = interpreter_with(Config::default(), host.clone());

    interpreter
        .process_source("<test>", "\"lib\" use \"4 double\" eval \"hello\" alert")
        .expect("evaluation failed");

    assert_eq!(source_stack(&interpreter), vec!["8"]);
    assert_eq!(host.alerts(), vec!["hello".to_string()]);
}

#[test]
fn floats_print_as_source_that_reads_back() {
    for value in [1e20, 0.1, -2.5, 1e-7, 3.0] {
        let source = Value::Float(value).to_source();

        assert_eq!(parse_literal(&source), Some(Value::Float(value)), "{}", source);
    }
}
