use crate::{
    lang::source_buffer::SourceLocation,
    runtime::{data_structures::value::Value, interpreter::WordHandlerInfo},
};
use std::{
    fmt::{self, Debug, Display, Formatter},
    rc::Rc,
};

/// The resolved meaning of a single token in a parsed list.
#[derive(Clone)]
pub enum Element {
    /// A word that was found in the dictionary when the code was parsed.  The handler it had then
    /// is kept, so redefining the name later only changes code parsed after the redefinition.
    Word(WordHandlerInfo),

    /// A literal value along with the text it was parsed from.
    Literal { text: String, value: Value },

    /// A nested list.  It's pushed onto the stack as a value when executed.
    Quote(QuotationPtr),

    /// A token that was neither a known word nor a literal at parse time.  It keeps its text and
    /// does nothing when executed.
    Unknown(String),
}

/// Two elements are equal when they'd serialize to the same source and mean the same thing.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Word(a), Element::Word(b)) => a.name() == b.name(),
            (
                Element::Literal {
                    text: a_text,
                    value: a_value,
                },
                Element::Literal {
                    text: b_text,
                    value: b_value,
                },
            ) => a_text == b_text && a_value == b_value,
            (Element::Quote(a), Element::Quote(b)) => a == b,
            (Element::Unknown(a), Element::Unknown(b)) => a == b,

            _ => false,
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Element::Word(word) => write!(f, "{}", word.name()),
            Element::Literal { text, .. } => write!(f, "{}", text),
            Element::Quote(quotation) => write!(f, "{}", quotation_source(quotation)),
            Element::Unknown(text) => write!(f, "{}", text),
        }
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Element::Word(word) => write!(f, "Word({})", word.name()),
            Element::Literal { text, .. } => write!(f, "Literal({})", text),
            Element::Quote(quotation) => write!(f, "Quote({})", quotation_source(quotation)),
            Element::Unknown(text) => write!(f, "Unknown({})", text),
        }
    }
}

impl Element {
    /// Wrap a runtime value so it can be stored in a list.  Lists become nested quotations, every
    /// other value becomes a literal that prints as valid source.
    pub fn from_value(value: Value) -> Element {
        match value {
            Value::List(quotation) => Element::Quote(quotation),
            _ => Element::Literal {
                text: value.to_source(),
                value,
            },
        }
    }

    /// The value this element would push when executed, if it is data rather than a word.
    pub fn as_value(&self) -> Option<Value> {
        match self {
            Element::Literal { value, .. } => Some(value.clone()),
            Element::Quote(quotation) => Some(Value::List(quotation.clone())),
            Element::Word(_) | Element::Unknown(_) => None,
        }
    }
}

/// A single element of a list, along with where it was found in the source text.  Elements built
/// by native words at run time have no location.
#[derive(Clone)]
pub struct Instruction {
    pub location: Option<SourceLocation>,
    pub element: Element,
}

/// Locations are ignored, the same code parsed from two places is still the same code.
impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.element)
    }
}

impl Debug for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self.element)
    }
}

impl Instruction {
    pub fn new(location: Option<SourceLocation>, element: Element) -> Instruction {
        Instruction { location, element }
    }
}

/// An ordered list of code.  Used for both the top level of a script and for nested lists, which
/// act as quotations.
pub type Quotation = Vec<Instruction>;

/// Quotations are immutable once parsed and shared by reference between the stack, the dictionary
/// and other lists.
pub type QuotationPtr = Rc<Quotation>;

/// Print a list as bracketed source text, `[ 1 2 + ]`.  An empty list prints as `[ ]`.
pub fn quotation_source(quotation: &Quotation) -> String {
    if quotation.is_empty() {
        "[ ]".to_string()
    } else {
        format!("[ {} ]", code_source(quotation))
    }
}

/// Print the contents of a list as source text without the enclosing brackets.  Parsing the
/// result gives back an equivalent list.
pub fn code_source(code: &Quotation) -> String {
    code.iter()
        .map(|instruction| instruction.to_string())
        .collect::<Vec<String>>()
        .join(" ")
}
