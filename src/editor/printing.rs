use crate::editor::{
    code_tree::{CodeTree, NodeId, NodeKind},
    cursor::Editor,
};

/// Serialize a run of nodes starting at `from`.  Output stops after `to`; when `to` is inside a
/// list the lists around it are still closed, so the result always parses.  Every token is
/// followed by a space: `1 [ 2 ] `.
pub fn code(tree: &CodeTree, from: NodeId, to: Option<NodeId>) -> String {
    let mut output = String::new();
    let mut stopped = false;

    write_code(tree, Some(from), to, &mut stopped, &mut output);
    output
}

fn write_code(
    tree: &CodeTree,
    mut node: Option<NodeId>,
    to: Option<NodeId>,
    stopped: &mut bool,
    output: &mut String,
) {
    while let Some(id) = node {
        match tree.kind(id) {
            NodeKind::List { first, .. } => {
                output.push_str("[ ");
                write_code(tree, Some(*first), to, stopped, output);
                output.push_str("] ");

                if *stopped {
                    return;
                }
            }

            NodeKind::Word { name, .. } => {
                output.push_str(name);
                output.push(' ');
            }

            NodeKind::Nil => (),
        }

        if Some(id) == to {
            *stopped = true;
            return;
        }

        node = tree.next(id);
    }
}

/// Show the editor state as one line of text.  The cursor is drawn as `|` after the node it sits
/// on and the selection is wrapped in `{` and `}`.
pub fn render(editor: &Editor) -> String {
    let mut output = String::new();
    let marks = Marks {
        cursor: editor.cursor(),
        selection: editor
            .selection()
            .map(|selection| (selection.from, selection.to)),
    };

    render_list(editor.tree(), Some(editor.root()), &marks, &mut output);
    output.trim_end().to_string()
}

struct Marks {
    cursor: NodeId,
    selection: Option<(NodeId, NodeId)>,
}

fn render_list(tree: &CodeTree, mut node: Option<NodeId>, marks: &Marks, output: &mut String) {
    while let Some(id) = node {
        if marks.selection.is_some_and(|(from, _)| from == id) {
            output.push('{');
        }

        match tree.kind(id) {
            NodeKind::List { first, .. } => {
                output.push_str("[ ");
                render_list(tree, Some(*first), marks, output);
                output.push(']');
            }

            NodeKind::Word { name, .. } => output.push_str(name),
            NodeKind::Nil => (),
        }

        if marks.selection.is_some_and(|(_, to)| to == id) {
            output.push('}');
        }

        if marks.cursor == id {
            output.push('|');
        }

        if !tree.is_nil(id) || marks.cursor == id {
            output.push(' ');
        }

        node = tree.next(id);
    }
}
