// Session tests: edits drive evaluation of the code up to the cursor.

use brief::lang::compilation::WordClass;
use brief::runtime::config::Config;
use brief::runtime::data_structures::value::Value;
use brief::runtime::error::ErrorKind;
use brief::runtime::host::MemoryHost;
use brief::session::{EditCommand, Session, SessionError};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn session() -> Session {
    Session::new(Config::default(), Rc::new(MemoryHost::new())).expect("bootstrap failed")
}

fn stack(session: &Session) -> Vec<String> {
    session.stack().iter().map(Value::to_source).collect()
}

const LEFT: EditCommand = EditCommand::MovePrev {
    step_in: false,
    step_out: true,
    select: false,
};

const SELECT_LEFT: EditCommand = EditCommand::MovePrev {
    step_in: false,
    step_out: false,
    select: true,
};

#[test]
fn typing_evaluates_up_to_the_cursor() {
    let mut session = session();

    let _ = session.load("3 4 swap");
    assert_eq!(stack(&session), vec!["3", "4"]);

    assert!(session.apply(LEFT));
    assert_eq!(session.evaluation().source, "3 4 ");
    assert_eq!(stack(&session), vec!["4", "3"]);
}

#[test]
fn words_are_inserted_one_at_a_time() {
    let mut session = session();

    for word in ["5", "factorial"] {
        assert!(session.apply(EditCommand::InsertWord(word.to_string())));
    }

    assert_eq!(stack(&session), vec!["120"]);
    assert_eq!(
        session.editor().word_at_cursor(),
        Some(("factorial", WordClass::Secondary))
    );
}

#[test]
fn lists_are_opened_and_closed() {
    let mut session = session();

    assert!(session.apply(EditCommand::InsertWord("2".to_string())));
    assert!(session.apply(EditCommand::InsertList));
    assert!(session.apply(EditCommand::InsertWord("10".to_string())));
    assert!(session.apply(EditCommand::InsertWord("*".to_string())));

    // Inside the list the list is closed for evaluation, so it is pushed as data.
    assert_eq!(stack(&session), vec!["[ 10 * ]", "2"]);

    assert!(session.apply(EditCommand::CloseList));
    assert!(session.apply(EditCommand::InsertWord("apply".to_string())));

    assert_eq!(stack(&session), vec!["20"]);
    assert_eq!(session.editor().source(), "2 [ 10 * ] apply ");
}

#[test]
fn words_defined_by_the_program_are_reclassified() {
    let mut session = session();

    let _ = session.load("[ dup * ] \"sq\" define 3 sq");

    // The word is bound when the text is read, before the define runs.
    assert_eq!(stack(&session), vec!["3"]);
    assert_eq!(
        session.editor().word_at_cursor(),
        Some(("sq", WordClass::Secondary))
    );
}

#[test]
fn defining_from_a_selection_keeps_the_meaning() {
    let mut session = session();

    let _ = session.load("2 3 dup * +");
    let before = session.evaluate("2 3 dup * + ").stack.clone();

    assert!(session.apply(LEFT));
    assert!(session.apply(SELECT_LEFT));
    assert!(session.apply(SELECT_LEFT));
    assert_eq!(session.editor().selection_source().as_deref(), Some("dup * "));

    session
        .define_selection("sq2", false)
        .expect("define failed");

    assert_eq!(session.editor().source(), "2 3 sq2 + ");
    assert_eq!(
        session.definitions(),
        &[("sq2".to_string(), "[ dup * ] \"sq2\" define".to_string())]
    );
    assert_eq!(
        session.editor().word_at_cursor(),
        Some(("sq2", WordClass::Secondary))
    );
    assert_eq!(stack(&session), vec!["9", "2"]);

    let source = session.editor().source();

    assert_eq!(session.evaluate(&source).stack, before);
    assert_eq!(stack(&session), vec!["11"]);
}

#[test]
fn definitions_survive_reevaluation() {
    let mut session = session();

    let _ = session.load("4 dup *");

    assert!(session.apply(SELECT_LEFT));
    assert!(session.apply(SELECT_LEFT));

    session
        .define_selection("squared", false)
        .expect("define failed");

    let _ = session.load("5 squared");

    assert_eq!(stack(&session), vec!["25"]);
    assert!(session.words().contains(&"squared".to_string()));
}

#[test]
fn bad_definitions_are_refused() {
    let mut session = session();

    let _ = session.load("1 2 +");

    assert!(matches!(
        session.define_selection("x", false),
        Err(SessionError::NoSelection)
    ));

    assert!(session.apply(SELECT_LEFT));

    assert!(matches!(
        session.define_selection("", false),
        Err(SessionError::EmptyName)
    ));
    assert!(matches!(
        session.define_selection("\"x", false),
        Err(SessionError::QuotedName)
    ));
    assert!(matches!(
        session.define_selection("a b", false),
        Err(SessionError::InvalidName { .. })
    ));
    assert!(matches!(
        session.define_selection("dup", false),
        Err(SessionError::AlreadyDefined(name)) if name == "dup"
    ));

    assert!(session.define_selection("dup", true).is_ok());
    assert_eq!(session.editor().source(), "1 2 dup ");
}

#[test]
fn redefining_a_primitive_leaves_the_prelude_alone() {
    let mut session = session();

    let _ = session.load("1 2 +");

    assert!(session.apply(SELECT_LEFT));
    assert!(session.define_selection("dup", true).is_ok());

    let _ = session.load("3 square");
    assert_eq!(stack(&session), vec!["9"]);

    let _ = session.load("true [ 1 ] [ 2 ] if");
    assert_eq!(stack(&session), vec!["1"]);

    let _ = session.load("4 5 dup");
    assert_eq!(stack(&session), vec!["9"]);
}

#[test]
fn quote_and_unquote_through_commands() {
    let mut session = session();

    let _ = session.load("1 2 3");

    assert!(session.apply(SELECT_LEFT));
    assert!(session.apply(SELECT_LEFT));
    assert!(session.apply(EditCommand::Quote));

    assert_eq!(session.editor().source(), "1 [ 2 3 ] ");
    assert_eq!(stack(&session), vec!["[ 2 3 ]", "1"]);

    assert!(session.apply(EditCommand::Unquote));
    assert_eq!(stack(&session), vec!["3", "2", "1"]);
}

#[test]
fn errors_are_reported_in_the_evaluation() {
    let mut session = session();

    let evaluation = session.load("1 +");

    assert!(!evaluation.is_ok());
    assert!(matches!(
        evaluation.error.as_ref().map(|error| error.kind()),
        Some(ErrorKind::StackUnderflow { .. })
    ));
    assert_eq!(stack(&session), vec!["1"]);
}

#[test]
fn completion_prefers_words_then_literals_then_strings() {
    let session = session();

    assert_eq!(session.complete("fac"), "factorial");
    assert_eq!(session.complete("fals"), "false");
    assert_eq!(session.complete("\"abc"), "\"abc\"");
    assert_eq!(session.complete("dup"), "dup");
    assert_eq!(session.complete("zzz"), "zzz");
    assert_eq!(session.complete(""), "");
}

#[test]
fn use_and_alert_reach_the_host() {
    let host = Rc::new(MemoryHost::new().with_source("greet", "\"hi\" alert 7"));
    let mut session = Session::new(Config::default(), host.clone()).expect("bootstrap failed");

    let _ = session.load("\"greet\" use");

    assert_eq!(stack(&session), vec!["7"]);
    assert_eq!(host.alerts(), vec!["hi".to_string()]);
}
