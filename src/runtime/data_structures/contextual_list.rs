use crate::runtime::data_structures::contextual_data::ContextualData;

/// One context's worth of items, along with the overall index of its first item.
struct Frame<T> {
    items: Vec<T>,
    start_index: usize,
}

/// An append only list whose items are grouped into contexts.  Indices handed out by insert stay
/// valid until the context holding the item is released.
///
/// The interpreter keeps its word handlers in one of these.  The dictionary refers to them by
/// index, and both are marked and released together.
pub struct ContextualList<T> {
    frames: Vec<Frame<T>>,
}

impl<T> ContextualData for ContextualList<T> {
    fn mark_context(&mut self) {
        let start_index = self.len();

        self.frames.push(Frame {
            items: Vec::new(),
            start_index,
        });
    }

    /// Release the newest context.  The root context can never be released, doing so is a bug in
    /// the interpreter so we panic.
    fn release_context(&mut self) {
        if self.frames.len() <= 1 {
            panic!("Releasing the root context of a contextual list!");
        }

        let _ = self.frames.pop();
    }
}

impl<T> Default for ContextualList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ContextualList<T> {
    /// Create an empty list with its root context already marked.
    pub fn new() -> ContextualList<T> {
        let mut new_list = ContextualList { frames: Vec::new() };

        new_list.mark_context();
        new_list
    }

    /// Length of the entire list across all contexts.
    pub fn len(&self) -> usize {
        match self.frames.last() {
            Some(top) => top.start_index + top.items.len(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up an item by its overall index.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.frames
            .iter()
            .rev()
            .find(|frame| index >= frame.start_index)
            .and_then(|frame| frame.items.get(index - frame.start_index))
    }

    /// Append an item to the newest context, returning its overall index.
    pub fn insert(&mut self, value: T) -> usize {
        let index = self.len();

        if let Some(top) = self.frames.last_mut() {
            top.items.push(value);
        }

        index
    }
}
