use crate::{
    editor::{
        code_tree::{CodeTree, NodeId, NodeKind},
        printing,
    },
    lang::{
        compilation::{Classify, WordClass},
        tokenizing::{Token, tokenize_from_source},
    },
};

/// A run of siblings, `from` before or equal to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub from: NodeId,
    pub to: NodeId,
}

/// Structural editing over a code tree.
///
/// The cursor always sits on a live node and new code goes in right after it.  Sitting on a list's
/// Nil means inserting at the front of that list.  The selection is kept as the two ends the user
/// marked, in the order they were marked, and normalized when it's read.
pub struct Editor {
    tree: CodeTree,
    cursor: NodeId,
    selection_from: Option<NodeId>,
    selection_to: Option<NodeId>,
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new()
    }
}

impl Editor {
    pub fn new() -> Editor {
        let tree = CodeTree::new();
        let cursor = tree.top();

        Editor {
            tree,
            cursor,
            selection_from: None,
            selection_to: None,
        }
    }

    pub fn tree(&self) -> &CodeTree {
        &self.tree
    }

    /// The Nil that starts the top level.
    pub fn root(&self) -> NodeId {
        self.tree.top()
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub fn has_selection(&self) -> bool {
        self.selection_from.is_some() || self.selection_to.is_some()
    }

    /// The selected run in document order.
    pub fn selection(&self) -> Option<Selection> {
        let (Some(from), Some(to)) = (self.selection_from, self.selection_to) else {
            return None;
        };

        let mut node = Some(from);

        while let Some(id) = node {
            if id == to {
                return Some(Selection { from, to });
            }

            node = self.tree.next(id);
        }

        Some(Selection { from: to, to: from })
    }

    /// Select the whole top level and put the cursor at its end.
    pub fn select_all(&mut self) {
        let top = self.tree.top();

        if let (Some(from), Some(to)) = (self.tree.next(top), self.tree.last(self.tree.root_list()))
        {
            self.selection_from = Some(from);
            self.selection_to = Some(to);
            self.cursor = to;
        }
    }

    pub fn select_none(&mut self) {
        self.selection_from = None;
        self.selection_to = None;
    }

    /// Move the far end of the selection.  `to` is the node being passed over and `direction` the
    /// node beyond it.  Passing back over the anchor drops the selection.
    fn extend_selection(&mut self, to: NodeId, direction: Option<NodeId>) {
        if self.selection_from == Some(to) {
            self.select_none();
            return;
        }

        if self.selection_from.is_none() {
            self.selection_from = Some(to);
        }

        let new_to = if self.selection_to == Some(to) {
            direction
        } else {
            Some(to)
        };

        match new_to {
            Some(id) if !self.tree.is_nil(id) => self.selection_to = Some(id),
            _ => self.select_none(),
        }
    }

    /// Move the cursor back one node.  Returns false if it couldn't move.
    ///
    /// With `step_in` a cursor on a list moves to the list's last child.  With `step_out` a cursor
    /// at the front of a list moves to just before the list.  While selecting neither applies and
    /// the selection grows or shrinks instead.
    pub fn move_prev(&mut self, step_in: bool, step_out: bool, select: bool) -> bool {
        let (step_in, step_out) = if select {
            (false, false)
        } else {
            self.select_none();
            (step_in, step_out)
        };

        if step_in && let Some(last) = self.tree.last(self.cursor) {
            self.cursor = last;
            return true;
        }

        if let Some(prev) = self.tree.prev(self.cursor) {
            if select {
                self.extend_selection(self.cursor, Some(prev));
            }

            self.cursor = prev;
            return true;
        }

        if step_out
            && let Some(prev) = self
                .tree
                .enclosing(self.cursor)
                .and_then(|list| self.tree.prev(list))
        {
            self.cursor = prev;
            return true;
        }

        false
    }

    /// Move the cursor forward one node.  Returns false if it couldn't move.
    ///
    /// With `step_in` moving onto a list moves into it, onto its Nil.  With `step_out` a cursor at
    /// the end of a list moves onto the list itself.
    pub fn move_next(&mut self, step_in: bool, step_out: bool, select: bool) -> bool {
        let (step_in, step_out) = if select {
            (false, false)
        } else {
            self.select_none();
            (step_in, step_out)
        };

        if let Some(next) = self.tree.next(self.cursor) {
            self.cursor = next;

            if step_in && let Some(first) = self.tree.first(next) {
                self.cursor = first;
            }

            if select {
                self.extend_selection(self.cursor, self.tree.next(self.cursor));
            }

            return true;
        }

        if step_out && let Some(list) = self.tree.enclosing(self.cursor) {
            self.cursor = list;
            return true;
        }

        false
    }

    /// Go to the front of the current list, or of the enclosing list if already there.
    pub fn move_first(&mut self, select: bool) -> bool {
        let moved = self.move_prev(false, false, select) || self.move_prev(false, true, select);

        while self.move_prev(false, false, select) {}

        moved
    }

    /// Go to the end of the current list, or past the enclosing list if already there.
    pub fn move_last(&mut self, select: bool) -> bool {
        let moved = self.move_next(false, false, select) || self.move_next(false, true, select);

        while self.move_next(false, false, select) {}

        moved
    }

    /// Step forward out of the list being typed into.
    pub fn close_list(&mut self) -> bool {
        self.move_next(true, true, false)
    }

    /// Add a word after the cursor and move onto it.
    pub fn insert_word(&mut self, classifier: &dyn Classify, name: &str) -> NodeId {
        let class = classifier.classify(name);

        self.insert_classified_word(class, name)
    }

    fn insert_classified_word(&mut self, class: WordClass, name: &str) -> NodeId {
        self.select_none();
        self.cursor = self.tree.insert_word_after(self.cursor, class, name);
        self.cursor
    }

    /// Add an empty list after the cursor and move into it.
    pub fn insert_list(&mut self) -> NodeId {
        self.select_none();

        let list = self.tree.insert_list_after(self.cursor);

        self.cursor = self.tree.first(list).unwrap_or(list);
        list
    }

    /// Insert source text at the cursor, token by token.  Brackets open and close lists, a `]`
    /// with no list open from this text is ignored.
    pub fn insert_source(&mut self, classifier: &dyn Classify, source: &str) {
        let (tokens, _) = tokenize_from_source("<insert>", source);
        let mut depth = 0usize;

        for token in tokens {
            match token {
                Token::OpenList(_) => {
                    let _ = self.insert_list();
                    depth += 1;
                }

                Token::CloseList(_) => {
                    if depth > 0 {
                        let _ = self.close_list();
                        depth -= 1;
                    }
                }

                Token::String(_, text) | Token::Word(_, text) => {
                    let _ = self.insert_word(classifier, &text);
                }
            }
        }

        // Leave the cursor after everything inserted, not inside a list left open.
        while depth > 0 && self.close_list() {
            depth -= 1;
        }
    }

    /// Unlink the selection, returning the run and leaving the cursor where it was.
    fn detach_selection(&mut self) -> Option<Selection> {
        let selection = self.selection()?;

        self.select_none();

        let prev = self.tree.unlink_range(selection.from, selection.to)?;

        self.cursor = prev;
        Some(selection)
    }

    /// Remove the selected nodes, the cursor ends up just before where they were.
    pub fn delete_selection(&mut self) -> bool {
        match self.detach_selection() {
            Some(Selection { from, to }) => {
                self.tree.free_range(from, to);
                true
            }

            None => false,
        }
    }

    /// Delete backwards.  With a selection the selection goes, otherwise the cursor moves back as
    /// `move_prev` would and the node it passed over is removed.
    pub fn delete_prev(&mut self, step_in: bool, step_out: bool) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }

        if !self.move_prev(step_in, step_out, false) {
            return false;
        }

        if let Some(passed) = self.tree.next(self.cursor) {
            let _ = self.tree.unlink_range(passed, passed);
            self.tree.free(passed);
        }

        true
    }

    /// Delete forwards, the mirror of `delete_prev`.
    pub fn delete_next(&mut self, step_in: bool, step_out: bool) -> bool {
        if self.has_selection() {
            return self.delete_selection();
        }

        self.move_next(step_in, step_out, false) && self.delete_prev(step_in, step_out)
    }

    /// Wrap the selection in a new list placed where the selection was.  The cursor ends up on
    /// the new list.
    pub fn quote_selection(&mut self) -> Option<NodeId> {
        let Selection { from, to } = self.detach_selection()?;
        let list = self.tree.insert_list_after(self.cursor);
        let nil = self.tree.first(list)?;

        self.tree.splice_range_after(nil, from, to);
        self.cursor = list;

        Some(list)
    }

    /// Replace the list under the cursor with its contents.  The cursor ends up on the last of
    /// them, or before the list if it was empty.
    pub fn unquote(&mut self) -> bool {
        let list = self.cursor;

        if !self.tree.is_list(list) {
            return false;
        }

        self.select_none();

        let children = self.tree.children(list);
        let Some(prev) = self.tree.unlink_range(list, list) else {
            return false;
        };

        self.cursor = prev;

        if let (Some(&from), Some(&to)) = (children.first(), children.last()) {
            self.tree.splice_range_after(prev, from, to);
            self.cursor = to;
        }

        self.tree.free_shell(list);
        true
    }

    /// Clear everything.
    pub fn clear(&mut self) {
        self.select_none();
        self.tree.clear();
        self.cursor = self.tree.top();
    }

    pub fn reclassify(&mut self, classifier: &dyn Classify) {
        self.tree.reclassify(classifier);
    }

    /// Serialize the run from `from` up to and including `to`.
    pub fn code(&self, from: NodeId, to: Option<NodeId>) -> String {
        printing::code(&self.tree, from, to)
    }

    /// The whole program as source text.
    pub fn source(&self) -> String {
        self.code(self.root(), None)
    }

    /// The program up to the cursor.  Lists the cursor is inside of are closed.
    pub fn source_to_cursor(&self) -> String {
        self.code(self.root(), Some(self.cursor))
    }

    /// The selected code as source text.
    pub fn selection_source(&self) -> Option<String> {
        self.selection()
            .map(|selection| self.code(selection.from, Some(selection.to)))
    }

    /// The name and class of the word under the cursor, if it is on one.
    pub fn word_at_cursor(&self) -> Option<(&str, WordClass)> {
        match self.tree.kind(self.cursor) {
            NodeKind::Word { class, name } => Some((name.as_str(), *class)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Everything;

    impl Classify for Everything {
        fn classify(&self, _token: &str) -> WordClass {
            WordClass::Unknown
        }
    }

    fn editor_with(source: &str) -> Editor {
        let mut editor = Editor::new();

        editor.insert_source(&Everything, source);
        editor
    }

    #[test]
    fn insert_list_moves_into_it() {
        let mut editor = Editor::new();
        let list = editor.insert_list();

        assert_eq!(editor.tree().first(list), Some(editor.cursor()));

        let _ = editor.insert_word(&Everything, "a");

        assert!(editor.close_list());
        assert_eq!(editor.cursor(), list);
        assert_eq!(editor.source(), "[ a ] ");
    }

    #[test]
    fn step_out_backwards_lands_before_the_list() {
        let mut editor = editor_with("a [ b ]");
        let a = editor.tree().next(editor.root()).unwrap();

        // Cursor is on the list, step in to b, back to the Nil, then out.
        assert!(editor.move_prev(true, true, false));
        assert!(editor.move_prev(false, true, false));
        assert!(editor.tree().is_nil(editor.cursor()));
        assert!(editor.move_prev(false, true, false));
        assert_eq!(editor.cursor(), a);
    }

    #[test]
    fn navigation_stops_at_the_top_level_edges() {
        let mut editor = editor_with("a");

        assert!(!editor.move_next(true, true, false));
        assert!(editor.move_prev(true, true, false));
        assert!(!editor.move_prev(true, true, false));
        assert_eq!(editor.cursor(), editor.root());
    }

    #[test]
    fn selection_extends_and_collapses() {
        let mut editor = editor_with("a b c");

        assert!(editor.move_prev(false, false, true));
        assert!(editor.move_prev(false, false, true));

        let selection = editor.selection().unwrap();

        assert_eq!(editor.code(selection.from, Some(selection.to)), "b c ");

        assert!(editor.move_next(false, false, true));
        assert!(editor.move_next(false, false, true));
        assert!(!editor.has_selection());
    }

    #[test]
    fn selection_never_ends_on_a_nil() {
        let mut editor = editor_with("a");

        assert!(editor.move_prev(false, false, true));
        assert!(!editor.move_prev(false, false, true));

        if let Some(selection) = editor.selection() {
            assert!(!editor.tree().is_nil(selection.from));
            assert!(!editor.tree().is_nil(selection.to));
        }
    }

    #[test]
    fn delete_selection_relinks_the_list() {
        let mut editor = editor_with("a b c");

        editor.select_all();
        assert!(editor.move_prev(false, false, true));
        assert!(editor.delete_prev(false, false));

        assert_eq!(editor.source(), "c ");
        assert_eq!(editor.cursor(), editor.root());
        assert!(editor.tree().is_consistent());
    }

    #[test]
    fn delete_next_removes_the_following_node() {
        let mut editor = editor_with("a b");

        assert!(editor.move_first(false));
        assert!(editor.delete_next(false, false));
        assert_eq!(editor.source(), "b ");
        assert!(!editor.delete_prev(false, false));
    }

    #[test]
    fn quote_then_unquote_restores_the_code() {
        let mut editor = editor_with("a b c");

        assert!(editor.move_prev(false, false, true));
        assert!(editor.move_prev(false, false, true));

        let list = editor.quote_selection().unwrap();

        assert_eq!(editor.cursor(), list);
        assert_eq!(editor.source(), "a [ b c ] ");
        assert!(editor.tree().is_consistent());

        assert!(editor.unquote());
        assert_eq!(editor.source(), "a b c ");
        assert_eq!(editor.word_at_cursor().map(|(name, _)| name), Some("c"));
        assert!(editor.tree().is_consistent());
    }

    #[test]
    fn unquote_of_an_empty_list_removes_it() {
        let mut editor = editor_with("a [ ]");

        assert!(editor.unquote());
        assert_eq!(editor.source(), "a ");
        assert_eq!(editor.tree().len(), 3);
    }

    #[test]
    fn source_to_cursor_closes_open_lists() {
        let mut editor = editor_with("1 [ 2 3 ] 4");

        assert!(editor.move_prev(false, false, false));
        assert!(editor.move_prev(true, false, false));
        assert!(editor.move_prev(false, false, false));

        assert_eq!(editor.source_to_cursor(), "1 [ 2 ] ");
    }

    #[test]
    fn move_first_and_last_step_out_when_at_an_end() {
        let mut editor = editor_with("a [ b c ]");

        assert!(editor.move_prev(true, false, false));
        assert!(editor.move_first(false));
        assert!(editor.tree().is_nil(editor.cursor()));
        assert!(editor.tree().enclosing(editor.cursor()).is_some());

        assert!(editor.move_first(false));
        assert_eq!(editor.cursor(), editor.root());

        assert!(editor.move_last(false));
        assert!(editor.tree().is_list(editor.cursor()));
    }
}
