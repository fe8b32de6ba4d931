use crate::lang::source_buffer::{SourceBuffer, SourceLocation};
use crate::runtime::error::{Diagnostics, ErrorKind, ScriptError};
use std::fmt::{self, Debug, Display, Formatter};

/// A token is the smallest unit the parser works with.  Brackets are always tokens of their own,
/// everything else is a run of non-whitespace text or a quoted string.
///
/// Tokens are not classified into numbers or words here.  Deciding what a token means is the job
/// of word resolution because a dictionary entry takes precedence over a literal reading.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A `[` opening a nested list.
    OpenList(SourceLocation),

    /// A `]` closing the current list.
    CloseList(SourceLocation),

    /// A quoted string.  The text is kept exactly as written, quotes and escapes included, so it
    /// can be shown and re-serialized unchanged.
    String(SourceLocation, String),

    /// Any other run of non-whitespace characters.
    Word(SourceLocation, String),
}

/// A list of tokens found in the source code.
pub type TokenList = Vec<Token>;

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Token::OpenList(_) => write!(f, "["),
            Token::CloseList(_) => write!(f, "]"),
            Token::String(_, text) => write!(f, "{}", text),
            Token::Word(_, text) => write!(f, "{}", text),
        }
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self)
    }
}

impl Token {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Token::OpenList(location) => location,
            Token::CloseList(location) => location,
            Token::String(location, _) => location,
            Token::Word(location, _) => location,
        }
    }
}

/// Check if the given character is considered whitespace.
pub fn is_whitespace(next: char) -> bool {
    next == ' ' || next == '\t' || next == '\r' || next == '\n' || next == '\x0c'
}

/// Read a quoted string token.  The opening quote is still in the buffer.  A backslash escapes the
/// character that follows it, so `\"` does not end the string.
///
/// Returns the partial text as an error when the source ends before the closing quote.
fn process_string(buffer: &mut SourceBuffer) -> Result<String, String> {
    let mut text = String::new();
    let mut escaped = false;

    if let Some(quote) = buffer.next_char() {
        text.push(quote);
    }

    while let Some(next) = buffer.next_char() {
        text.push(next);

        if escaped {
            escaped = false;
        } else if next == '\\' {
            escaped = true;
        } else if next == '"' {
            return Ok(text);
        }
    }

    Err(text)
}

/// Pull text out of the buffer until whitespace or a bracket.
fn process_until_break(buffer: &mut SourceBuffer) -> String {
    let mut text = String::new();

    while let Some(next) = buffer.peek_next() {
        if is_whitespace(next) || next == '[' || next == ']' {
            break;
        }

        text.push(next);
        let _ = buffer.next_char();
    }

    text
}

/// Split source text into tokens.  Lexing never fails outright; an unterminated string is dropped
/// and reported in the returned diagnostics so the rest of the text can still be evaluated.
pub fn tokenize_from_source(name: &str, source: &str) -> (TokenList, Diagnostics) {
    let mut buffer = SourceBuffer::new(name, source);
    let mut token_list = TokenList::new();
    let mut diagnostics = Diagnostics::new();

    while let Some(next) = buffer.peek_next() {
        let location = buffer.location().clone();

        match next {
            _ if is_whitespace(next) => {
                let _ = buffer.next_char();
            }

            '[' => {
                let _ = buffer.next_char();
                token_list.push(Token::OpenList(location));
            }

            ']' => {
                let _ = buffer.next_char();
                token_list.push(Token::CloseList(location));
            }

            '"' => match process_string(&mut buffer) {
                Ok(text) => token_list.push(Token::String(location, text)),
                Err(partial) => {
                    tracing::warn!(%location, token = %partial, "dropping unterminated string");

                    diagnostics.push(ScriptError::new(
                        Some(location),
                        ErrorKind::UnterminatedString(partial),
                        None,
                    ));
                }
            },

            _ => {
                let text = process_until_break(&mut buffer);
                token_list.push(Token::Word(location, text));
            }
        }
    }

    (token_list, diagnostics)
}
