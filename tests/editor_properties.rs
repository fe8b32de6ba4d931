//! Property tests for the structural editor.
//!
//! Random edit sequences are applied to a fresh editor and the link structure, the navigation
//! round trip, insert-then-delete and the serialization round trip are checked on the result.

use brief::editor::{Editor, NodeId};
use brief::lang::compilation::{Classify, WordClass};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

struct Unclassified;

impl Classify for Unclassified {
    fn classify(&self, _token: &str) -> WordClass {
        WordClass::Unknown
    }
}

// -- Edit Generation Strategies --

#[derive(Clone, Debug)]
enum Op {
    Word(String),
    List,
    Close,
    Prev(bool, bool, bool),
    Next(bool, bool, bool),
    First(bool),
    Last(bool),
    DeletePrev(bool, bool),
    DeleteNext(bool, bool),
    SelectAll,
    SelectNone,
    Quote,
    Unquote,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => prop::sample::select(vec!["a", "b", "1", "dup", "\"s t\""])
            .prop_map(|word| Op::Word(word.to_string())),
        1 => Just(Op::List),
        1 => Just(Op::Close),
        2 => any::<(bool, bool, bool)>().prop_map(|(step_in, step_out, select)| {
            Op::Prev(step_in, step_out, select)
        }),
        2 => any::<(bool, bool, bool)>().prop_map(|(step_in, step_out, select)| {
            Op::Next(step_in, step_out, select)
        }),
        1 => any::<bool>().prop_map(Op::First),
        1 => any::<bool>().prop_map(Op::Last),
        1 => any::<(bool, bool)>().prop_map(|(step_in, step_out)| Op::DeletePrev(step_in, step_out)),
        1 => any::<(bool, bool)>().prop_map(|(step_in, step_out)| Op::DeleteNext(step_in, step_out)),
        1 => Just(Op::SelectAll),
        1 => Just(Op::SelectNone),
        1 => Just(Op::Quote),
        1 => Just(Op::Unquote),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..40)
}

fn apply(editor: &mut Editor, op: &Op) {
    match op {
        Op::Word(name) => {
            let _ = editor.insert_word(&Unclassified, name);
        }
        Op::List => {
            let _ = editor.insert_list();
        }
        Op::Close => {
            let _ = editor.close_list();
        }
        Op::Prev(step_in, step_out, select) => {
            let _ = editor.move_prev(*step_in, *step_out, *select);
        }
        Op::Next(step_in, step_out, select) => {
            let _ = editor.move_next(*step_in, *step_out, *select);
        }
        Op::First(select) => {
            let _ = editor.move_first(*select);
        }
        Op::Last(select) => {
            let _ = editor.move_last(*select);
        }
        Op::DeletePrev(step_in, step_out) => {
            let _ = editor.delete_prev(*step_in, *step_out);
        }
        Op::DeleteNext(step_in, step_out) => {
            let _ = editor.delete_next(*step_in, *step_out);
        }
        Op::SelectAll => editor.select_all(),
        Op::SelectNone => editor.select_none(),
        Op::Quote => {
            let _ = editor.quote_selection();
        }
        Op::Unquote => {
            let _ = editor.unquote();
        }
    }
}

fn editor_after(ops: &[Op]) -> Editor {
    let mut editor = Editor::new();

    for op in ops {
        apply(&mut editor, op);
    }

    editor
}

/// Does a forward scan from `from` reach `to`?
fn reaches(editor: &Editor, from: NodeId, to: NodeId) -> bool {
    let mut node = Some(from);

    while let Some(id) = node {
        if id == to {
            return true;
        }

        node = editor.tree().next(id);
    }

    false
}

// -- Program Generation Strategies --

#[derive(Clone, Debug)]
enum Item {
    Word(String),
    List(Vec<Item>),
}

fn item_strategy() -> impl Strategy<Value = Item> {
    let word = prop_oneof![
        prop::string::string_regex("[a-z0-9+*?-]{1,6}").expect("valid regex"),
        prop::string::string_regex("\"[a-z ]{0,5}\"").expect("valid regex"),
    ]
    .prop_map(Item::Word);

    word.prop_recursive(4, 32, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(Item::List)
    })
}

/// Print a program in the editor's own layout, every token followed by a space.
fn print(items: &[Item], output: &mut String) {
    for item in items {
        match item {
            Item::Word(name) => {
                output.push_str(name);
                output.push(' ');
            }
            Item::List(items) => {
                output.push_str("[ ");
                print(items, output);
                output.push_str("] ");
            }
        }
    }
}

proptest! {
    #[test]
    fn links_stay_consistent(ops in ops_strategy()) {
        let mut editor = Editor::new();

        for op in &ops {
            apply(&mut editor, op);

            prop_assert!(editor.tree().is_consistent(), "broken links after {:?}", op);
            prop_assert!(editor.tree().contains(editor.cursor()));
        }
    }

    #[test]
    fn selections_are_normalized_sibling_runs(ops in ops_strategy()) {
        let editor = editor_after(&ops);

        if let Some(selection) = editor.selection() {
            let tree = editor.tree();

            prop_assert!(!tree.is_nil(selection.from));
            prop_assert!(!tree.is_nil(selection.to));
            prop_assert_eq!(tree.parent(selection.from), tree.parent(selection.to));
            prop_assert!(reaches(&editor, selection.from, selection.to));
        }
    }

    #[test]
    fn moving_next_then_prev_returns(
        ops in ops_strategy(),
        (step_in, step_out) in prop_oneof![Just((false, false)), Just((true, true))]
    ) {
        let mut editor = editor_after(&ops);
        let start = editor.cursor();

        if editor.move_next(step_in, step_out, false) {
            prop_assert!(editor.move_prev(step_in, step_out, false));
            prop_assert_eq!(editor.cursor(), start);
        }
    }

    #[test]
    fn insert_then_delete_restores(ops in ops_strategy(), as_list in any::<bool>()) {
        let mut editor = editor_after(&ops);

        editor.select_none();

        let source = editor.source();
        let nodes = editor.tree().len();
        let cursor = editor.cursor();

        if as_list {
            let _ = editor.insert_list();
            prop_assert!(editor.delete_prev(false, true));
        } else {
            let _ = editor.insert_word(&Unclassified, "x");
            prop_assert!(editor.delete_prev(false, false));
        }

        prop_assert_eq!(editor.source(), source);
        prop_assert_eq!(editor.tree().len(), nodes);
        prop_assert_eq!(editor.cursor(), cursor);
        prop_assert!(editor.tree().is_consistent());
    }

    #[test]
    fn code_to_tree_to_code(program in prop::collection::vec(item_strategy(), 0..10)) {
        let mut text = String::new();

        print(&program, &mut text);

        let mut editor = Editor::new();

        editor.insert_source(&Unclassified, &text);

        prop_assert_eq!(editor.source(), text);
        prop_assert!(editor.tree().is_consistent());
    }
}

#[test]
fn select_all_covers_the_top_level() {
    let mut editor = Editor::new();

    editor.insert_source(&Unclassified, "a [ b ] c");
    editor.select_all();

    let selection = editor.selection().expect("nothing selected");

    assert_eq!(editor.code(selection.from, Some(selection.to)), "a [ b ] c ");
    assert_eq!(editor.cursor(), selection.to);
}
