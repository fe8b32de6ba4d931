use crate::{
    lang::{
        code::{Element, Instruction, Quotation},
        tokenizing::{Token, TokenList, tokenize_from_source},
    },
    runtime::{
        data_structures::{
            dictionary::{Dictionary, WordType},
            value::Value,
        },
        error::{Diagnostics, ErrorKind, ScriptError},
        interpreter::WordHandlerInfo,
    },
};
use std::rc::Rc;

/// How a token reads to the editor.  Follows the same precedence as word resolution, so a word
/// that shadows a literal is colored as a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordClass {
    String,
    Number,
    Boolean,
    Primitive,
    Secondary,
    Unknown,
}

/// Anything that can tell the editor what a token means.
pub trait Classify {
    fn classify(&self, token: &str) -> WordClass;
}

/// Binds word names for the parser.
pub trait Resolve {
    /// The word the name means right now, or None if it isn't defined.
    fn bind_word(&self, name: &str) -> Option<WordHandlerInfo>;
}

/// Classification against a dictionary: words first, then literals, then unknown.
impl Classify for Dictionary {
    fn classify(&self, token: &str) -> WordClass {
        if let Some(word) = self.try_get(token) {
            return match word.word_type {
                WordType::Primitive => WordClass::Primitive,
                WordType::Secondary => WordClass::Secondary,
            };
        }

        match parse_literal(token) {
            Some(Value::String(_)) => WordClass::String,
            Some(Value::Bool(_)) => WordClass::Boolean,
            Some(_) => WordClass::Number,
            None => WordClass::Unknown,
        }
    }
}

/// Attempt to convert the text into a numeric literal.  This can be either an integer or floating
/// point number, with or without an exponent.  We also support hexadecimal and binary literals,
/// and using _ as a separator for readability.
fn to_numeric(text: &str) -> Option<Value> {
    let starts_like_number = text
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_digit() || first == '-' || first == '.');

    if !starts_like_number {
        return None;
    }

    if let Some(stripped) = text.strip_prefix("0x") {
        i64::from_str_radix(&stripped.replace('_', ""), 16).ok().map(Value::Int)
    } else if let Some(stripped) = text.strip_prefix("0b") {
        i64::from_str_radix(&stripped.replace('_', ""), 2).ok().map(Value::Int)
    } else if text.contains(['.', 'e', 'E']) {
        text.replace('_', "").parse::<f64>().ok().map(Value::Float)
    } else {
        text.replace('_', "").parse::<i64>().ok().map(Value::Int)
    }
}

/// Translate the escape sequences of a quoted string token's body.  `\n`, `\r` and `\t` are
/// translated, any other escaped character is passed through, which covers `\"` and `\\`.
fn unescape(body: &str) -> String {
    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(next) = chars.next() {
        if next != '\\' {
            text.push(next);
            continue;
        }

        match chars.next() {
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            Some('t') => text.push('\t'),
            Some(escaped) => text.push(escaped),
            None => text.push('\\'),
        }
    }

    text
}

/// Is the text a complete quoted string?  The closing quote must not be escaped.
fn is_quoted(text: &str) -> bool {
    if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
        return false;
    }

    let body = &text[1..text.len() - 1];
    let trailing_slashes = body.chars().rev().take_while(|&c| c == '\\').count();

    trailing_slashes % 2 == 0
}

/// Try to read a token as a literal value: a number, `true`, `false` or a quoted string.
pub fn parse_literal(text: &str) -> Option<Value> {
    match text {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        _ if is_quoted(text) => Some(Value::String(unescape(&text[1..text.len() - 1]))),
        _ => to_numeric(text),
    }
}

/// Resolve a single token.  A dictionary entry wins over a literal reading, and anything that is
/// neither becomes an inert unknown element that keeps its text.  Words are bound here, once.
pub fn resolve(resolver: &dyn Resolve, text: &str) -> Element {
    if let Some(word) = resolver.bind_word(text) {
        Element::Word(word)
    } else if let Some(value) = parse_literal(text) {
        Element::Literal {
            text: text.to_string(),
            value,
        }
    } else {
        Element::Unknown(text.to_string())
    }
}

/// Recursive descent over the token stream.  Returns when the list is closed or the tokens run
/// out, an unclosed list is accepted as is.
fn parse_list(
    resolver: &dyn Resolve,
    tokens: &mut std::vec::IntoIter<Token>,
    depth: usize,
    diagnostics: &mut Diagnostics,
) -> Quotation {
    let mut code = Quotation::new();

    while let Some(token) = tokens.next() {
        match token {
            Token::OpenList(location) => {
                let nested = parse_list(resolver, tokens, depth + 1, diagnostics);
                code.push(Instruction::new(
                    Some(location),
                    Element::Quote(Rc::new(nested)),
                ));
            }

            Token::CloseList(location) => {
                if depth > 0 {
                    return code;
                }

                tracing::warn!(%location, "ignoring unbalanced ']'");
                diagnostics.push(ScriptError::new(
                    Some(location),
                    ErrorKind::UnbalancedClose,
                    None,
                ));
            }

            Token::String(location, text) | Token::Word(location, text) => {
                let element = resolve(resolver, &text);
                code.push(Instruction::new(Some(location), element));
            }
        }
    }

    code
}

/// Build a list of code from tokens, binding every word as it's found.
pub fn parse_tokens(resolver: &dyn Resolve, tokens: TokenList) -> (Quotation, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut iter = tokens.into_iter();
    let code = parse_list(resolver, &mut iter, 0, &mut diagnostics);

    (code, diagnostics)
}

/// Lex and parse source text in one go.  Diagnostics from both phases are returned together.
pub fn parse_source(
    resolver: &dyn Resolve,
    name: &str,
    source: &str,
) -> (Quotation, Diagnostics) {
    let (tokens, mut diagnostics) = tokenize_from_source(name, source);
    let (code, parse_diagnostics) = parse_tokens(resolver, tokens);

    diagnostics.extend(parse_diagnostics);
    (code, diagnostics)
}
