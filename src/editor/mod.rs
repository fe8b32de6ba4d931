/// The node arena the program being edited lives in.
pub mod code_tree;

/// The cursor and selection, and every navigation and mutation of the tree.
pub mod cursor;

/// Turning nodes back into source text.
pub mod printing;

pub use code_tree::{CodeTree, Node, NodeId, NodeKind};
pub use cursor::{Editor, Selection};
