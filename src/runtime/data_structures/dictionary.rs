use crate::{
    lang::source_buffer::SourceLocation, runtime::data_structures::contextual_data::ContextualData,
};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

/// How a word in the dictionary is implemented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordType {
    /// A native word written in Rust with a fixed arity.
    Primitive,

    /// A word defined in Brief from a quotation.
    Secondary,
}

impl Display for WordType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            WordType::Primitive => write!(f, "primitive"),
            WordType::Secondary => write!(f, "secondary"),
        }
    }
}

/// The information stored in the dictionary for each word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WordInfo {
    /// Where the word was defined.  Primitives point at the Rust source that registered them.
    pub location: SourceLocation,

    pub name: String,

    pub word_type: WordType,

    /// A simple description of the word.
    pub description: String,

    /// The stack signature of the word.
    pub signature: String,

    /// The index of the word's handler in the interpreter's handler list.
    pub handler_index: usize,
}

impl WordInfo {
    pub fn new(location: SourceLocation, name: String, word_type: WordType) -> WordInfo {
        WordInfo {
            location,
            name,
            word_type,
            description: String::new(),
            signature: String::new(),
            handler_index: 0,
        }
    }
}

/// A sub dictionary of words is kept for each context in the main dictionary struct.
type SubDictionary = HashMap<String, WordInfo>;

/// Maps word names to their descriptors.  The last definition of a name wins and nothing is ever
/// removed, except by releasing the context the word was defined in.
///
/// The interpreter marks a context once bootstrapping is done, so releasing it drops every word
/// a program defined and leaves the primitives and the prelude in place.
pub struct Dictionary {
    stack: Vec<SubDictionary>,
}

impl ContextualData for Dictionary {
    fn mark_context(&mut self) {
        self.stack.push(SubDictionary::new());
    }

    /// Release the newest context and forget the words defined in it.  The root context holds the
    /// primitives and can't be released, trying to is a bug so we panic.
    fn release_context(&mut self) {
        if self.stack.len() <= 1 {
            panic!("Releasing the root context of the dictionary!");
        }

        let _ = self.stack.pop();
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// List every visible word once, sorted by name, with its type and description.
impl Display for Dictionary {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let merged = self.get_merged();
        let max_size = merged.keys().map(|name| name.len()).max().unwrap_or(0);

        writeln!(formatter, "{} words defined.\n", merged.len())?;

        for name in self.names() {
            if let Some(word) = merged.get(&name) {
                writeln!(
                    formatter,
                    "{:width$}  {:9}  {:14}  {}",
                    name,
                    word.word_type.to_string(),
                    word.signature,
                    word.description,
                    width = max_size
                )?;
            }
        }

        Ok(())
    }
}

impl Dictionary {
    /// Create an empty dictionary with its root context.
    pub fn new() -> Dictionary {
        let mut new_dictionary = Dictionary { stack: Vec::new() };

        new_dictionary.mark_context();
        new_dictionary
    }

    /// Insert a word into the newest context, shadowing any older definition of the name.
    pub fn insert(&mut self, name: String, info: WordInfo) {
        if let Some(top) = self.stack.last_mut() {
            let _ = top.insert(name, info);
        }
    }

    /// A flattened copy of the dictionary holding only the newest definition of each word.
    pub fn get_merged(&self) -> SubDictionary {
        let mut merged = SubDictionary::new();

        for sub_dictionary in self.stack.iter() {
            for (name, info) in sub_dictionary.iter() {
                let _ = merged.insert(name.clone(), info.clone());
            }
        }

        merged
    }

    /// Find the newest definition of a word.
    pub fn try_get(&self, name: &str) -> Option<&WordInfo> {
        self.stack
            .iter()
            .rev()
            .find_map(|sub_dictionary| sub_dictionary.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.try_get(name).is_some()
    }

    /// Every defined name, sorted and without duplicates.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.get_merged().into_keys().collect();

        names.sort();
        names
    }
}
