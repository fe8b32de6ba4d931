use crate::lang::compilation::{Classify, WordClass};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle of a node in a code tree.  Stays valid until the node is removed from the tree.
    pub struct NodeId;
}

/// What a node in the tree holds.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// The sentinel at the start of every list.  The cursor sits on it to insert at the front.
    Nil,

    /// A single token, along with how it read the last time it was classified.
    Word { class: WordClass, name: String },

    /// A nested list.  `first` is the list's own Nil, `last` the final child or `first` when the
    /// list is empty.
    List { first: NodeId, last: NodeId },
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub parent: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Node {
        Node {
            kind,
            prev: None,
            next: None,
            parent: None,
        }
    }
}

/// The program being edited, as doubly linked sibling chains with parent links.  Nodes live in an
/// arena and refer to each other by handle.
///
/// The top level is held by a hidden root list, so every node other than the root has a parent
/// and the top level keeps its `last` up to date like any other list.
pub struct CodeTree {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for CodeTree {
    fn default() -> Self {
        CodeTree::new()
    }
}

impl CodeTree {
    pub fn new() -> CodeTree {
        let mut nodes = SlotMap::with_key();
        let root = Self::new_list_node(&mut nodes);

        CodeTree { nodes, root }
    }

    /// Create an empty list with its Nil, both unlinked.
    fn new_list_node(nodes: &mut SlotMap<NodeId, Node>) -> NodeId {
        let nil = nodes.insert(Node::new(NodeKind::Nil));
        let list = nodes.insert(Node::new(NodeKind::List {
            first: nil,
            last: nil,
        }));

        nodes[nil].parent = Some(list);
        list
    }

    /// The hidden list that holds the top level.
    pub fn root_list(&self) -> NodeId {
        self.root
    }

    /// The Nil that starts the top level.
    pub fn top(&self) -> NodeId {
        self.first(self.root).unwrap_or(self.root)
    }

    /// The number of live nodes, the root list and its Nil included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next(self.top()).is_none()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id].kind
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].prev
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].next
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// The list a node sits in, unless that is the top level.  This is the list navigation can
    /// step out of.
    pub fn enclosing(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|parent| *parent != self.root)
    }

    pub fn first(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes[id].kind {
            NodeKind::List { first, .. } => Some(first),
            _ => None,
        }
    }

    pub fn last(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes[id].kind {
            NodeKind::List { last, .. } => Some(last),
            _ => None,
        }
    }

    pub fn is_list(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].kind, NodeKind::List { .. })
    }

    pub fn is_nil(&self, id: NodeId) -> bool {
        matches!(self.nodes[id].kind, NodeKind::Nil)
    }

    /// The real children of a list, in order, without its Nil.
    pub fn children(&self, list: NodeId) -> Vec<NodeId> {
        match self.first(list).and_then(|first| self.next(first)) {
            Some(start) => self.siblings_from(start),
            None => Vec::new(),
        }
    }

    /// A node and every sibling after it.
    fn siblings_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut node = Some(start);

        while let Some(id) = node {
            ids.push(id);
            node = self.next(id);
        }

        ids
    }

    /// The sibling run from `from` to `to` inclusive.  If `to` isn't reached the run goes to the
    /// end of the list.
    pub fn range(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut node = Some(from);

        while let Some(id) = node {
            ids.push(id);

            if id == to {
                break;
            }

            node = self.next(id);
        }

        ids
    }

    fn set_last(&mut self, list: Option<NodeId>, last: NodeId) {
        if let Some(list) = list
            && let NodeKind::List { last: old_last, .. } = &mut self.nodes[list].kind
        {
            *old_last = last;
        }
    }

    /// Link an unlinked node in after the anchor, in the anchor's list.
    fn link_after(&mut self, anchor: NodeId, node: NodeId) {
        let parent = self.parent(anchor);
        let next = self.next(anchor);

        {
            let node = &mut self.nodes[node];

            node.prev = Some(anchor);
            node.next = next;
            node.parent = parent;
        }

        self.nodes[anchor].next = Some(node);

        match next {
            Some(next) => self.nodes[next].prev = Some(node),
            None => self.set_last(parent, node),
        }
    }

    /// Add a word after the anchor.
    pub fn insert_word_after(&mut self, anchor: NodeId, class: WordClass, name: &str) -> NodeId {
        let word = self.nodes.insert(Node::new(NodeKind::Word {
            class,
            name: name.to_string(),
        }));

        self.link_after(anchor, word);
        word
    }

    /// Add an empty list after the anchor.
    pub fn insert_list_after(&mut self, anchor: NodeId) -> NodeId {
        let list = Self::new_list_node(&mut self.nodes);

        self.link_after(anchor, list);
        list
    }

    /// Take a sibling run out of its list without freeing it.  Returns the node that preceded the
    /// run, which takes its place.
    pub fn unlink_range(&mut self, from: NodeId, to: NodeId) -> Option<NodeId> {
        let prev = self.prev(from)?;
        let next = self.next(to);
        let parent = self.parent(from);

        self.nodes[prev].next = next;

        match next {
            Some(next) => self.nodes[next].prev = Some(prev),
            None => self.set_last(parent, prev),
        }

        self.nodes[from].prev = None;
        self.nodes[to].next = None;

        Some(prev)
    }

    /// Link a detached run in after the anchor and move every node in it to the anchor's list.
    pub fn splice_range_after(&mut self, anchor: NodeId, from: NodeId, to: NodeId) {
        let parent = self.parent(anchor);
        let next = self.next(anchor);

        for id in self.range(from, to) {
            self.nodes[id].parent = parent;
        }

        self.nodes[anchor].next = Some(from);
        self.nodes[from].prev = Some(anchor);
        self.nodes[to].next = next;

        match next {
            Some(next) => self.nodes[next].prev = Some(to),
            None => self.set_last(parent, to),
        }
    }

    /// Free a node, and everything in it if it's a list.  The node must already be unlinked.
    pub fn free(&mut self, id: NodeId) {
        if let Some(first) = self.first(id) {
            for child in self.siblings_from(first) {
                self.free(child);
            }
        }

        let _ = self.nodes.remove(id);
    }

    /// Free a detached run of siblings.
    pub fn free_range(&mut self, from: NodeId, to: NodeId) {
        for id in self.range(from, to) {
            self.free(id);
        }
    }

    /// Free a list node and its Nil, leaving its former children alone.
    pub fn free_shell(&mut self, list: NodeId) {
        if let Some(first) = self.first(list) {
            let _ = self.nodes.remove(first);
        }

        let _ = self.nodes.remove(list);
    }

    /// Empty the tree back to a lone top level Nil.
    pub fn clear(&mut self) {
        for child in self.children(self.root) {
            self.free(child);
        }

        let top = self.top();

        self.nodes[top].next = None;
        self.set_last(Some(self.root), top);
    }

    /// Classify every word again, so words defined since they were typed show correctly.
    pub fn reclassify(&mut self, classifier: &dyn Classify) {
        for node in self.nodes.values_mut() {
            if let NodeKind::Word { class, name } = &mut node.kind {
                *class = classifier.classify(name);
            }
        }
    }

    /// Check the link structure: prev and next agree, every list starts with its Nil and ends at
    /// its `last`, and every child points at its list.
    pub fn is_consistent(&self) -> bool {
        self.list_is_consistent(self.root)
    }

    fn list_is_consistent(&self, list: NodeId) -> bool {
        let (Some(first), Some(last)) = (self.first(list), self.last(list)) else {
            return false;
        };

        if !self.is_nil(first) || self.prev(first).is_some() || self.parent(first) != Some(list) {
            return false;
        }

        let mut node = first;

        loop {
            if self.parent(node) != Some(list) {
                return false;
            }

            if self.is_list(node) && !self.list_is_consistent(node) {
                return false;
            }

            match self.next(node) {
                Some(next) => {
                    if self.prev(next) != Some(node) || self.is_nil(next) {
                        return false;
                    }

                    node = next;
                }

                None => return node == last,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_is_a_lone_nil() {
        let tree = CodeTree::new();
        let top = tree.top();

        assert!(tree.is_nil(top));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.last(tree.root_list()), Some(top));
        assert!(tree.is_consistent());
    }

    #[test]
    fn inserting_at_the_tail_moves_last() {
        let mut tree = CodeTree::new();
        let top = tree.top();

        let one = tree.insert_word_after(top, WordClass::Number, "1");
        let list = tree.insert_list_after(one);

        assert_eq!(tree.last(tree.root_list()), Some(list));
        assert_eq!(tree.enclosing(one), None);

        let nil = tree.first(list).unwrap();
        let inner = tree.insert_word_after(nil, WordClass::Unknown, "x");

        assert_eq!(tree.last(list), Some(inner));
        assert_eq!(tree.enclosing(inner), Some(list));
        assert!(tree.is_consistent());
    }

    #[test]
    fn freeing_a_list_frees_its_contents() {
        let mut tree = CodeTree::new();
        let top = tree.top();

        let list = tree.insert_list_after(top);
        let nil = tree.first(list).unwrap();
        let _ = tree.insert_word_after(nil, WordClass::Number, "1");

        assert_eq!(tree.len(), 5);

        let _ = tree.unlink_range(list, list);
        tree.free(list);

        assert_eq!(tree.len(), 2);
        assert!(tree.is_consistent());
    }
}
