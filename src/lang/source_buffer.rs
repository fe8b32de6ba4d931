use core::str::Chars;
use std::{ fmt::{ self,
                  Display,
                  Formatter },
           hash::{ Hash,
                   Hasher } };



/// Where a token was found in the text handed to the lexer.  Locations are attached to tokens,
/// word references and diagnostics so that errors can point back at the offending text.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, Debug, PartialEq, PartialOrd, Eq)]
pub struct SourceLocation
{
    /// A tag naming the text being processed.  Live re-evaluation uses "\<editor\>", files use
    /// their path.
    name: String,

    /// The 1 based line number of the token.
    line: usize,

    /// The 1 based column number of the token.
    column: usize
}


impl Hash for SourceLocation
{
    fn hash<H: Hasher>(&self, state: &mut H)
    {
        self.name.hash(state);
        self.line.hash(state);
        self.column.hash(state);
    }
}


impl Display for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), fmt::Error>
    {
        write!(formatter, "{} ({}, {})", self.name, self.line, self.column)
    }
}


impl Default for SourceLocation
{
    fn default() -> Self
    {
        SourceLocation::new("unspecified")
    }
}


impl SourceLocation
{
    /// A location at the very start of the named text.
    pub fn new(name: &str) -> SourceLocation
    {
        SourceLocation { name: name.to_owned(), line: 1, column: 1 }
    }

    /// Create a location with all of its parts.  Useful with the location_here! macro.
    pub fn new_from_info(name: &str, line: usize, column: usize) -> Self
    {
        SourceLocation { name: name.to_owned(), line, column }
    }

    pub fn name(&self) -> &String
    {
        &self.name
    }

    pub fn line(&self) -> usize
    {
        self.line
    }

    pub fn column(&self) -> usize
    {
        self.column
    }
}



/// Get the location of the macro invocation in the Rust source.  Native words use this when they
/// report errors or run code on the interpreter's behalf.
#[macro_export]
macro_rules! location_here
{
    () =>
    {
        $crate::lang::source_buffer::SourceLocation::new_from_info(file!(),
                                                                   line!() as usize,
                                                                   column!() as usize)
    };
}



/// A forward only character reader over source text that keeps track of the line and column of
/// the next character.
///
/// The buffer borrows the text, nothing is copied.
pub struct SourceBuffer<'a>
{
    chars: Chars<'a>,

    /// Location of the next character to be consumed.
    location: SourceLocation,

    /// A character that has been peeked at but not yet consumed.
    current: Option<char>
}


impl<'a> SourceBuffer<'a>
{
    pub fn new(name: &str, source: &'a str) -> Self
    {
        SourceBuffer
            {
                chars: source.chars(),
                location: SourceLocation::new(name),
                current: None
            }
    }

    /// The location of the next character in the text.
    pub fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    /// Take a peek at the next character without consuming it.
    pub fn peek_next(&mut self) -> Option<char>
    {
        if self.current.is_none()
        {
            self.current = self.chars.next();
        }

        self.current
    }

    /// Get and consume the next character.
    pub fn next_char(&mut self) -> Option<char>
    {
        let next = match self.current.take()
            {
                Some(peeked) => Some(peeked),
                None => self.chars.next()
            };

        if let Some(next_char) = next
        {
            self.increment_location(next_char);
        }

        next
    }

    /// Advance one column for regular characters, new lines move to column 1 of the next line.
    fn increment_location(&mut self, next: char)
    {
        if next == '\n'
        {
            self.location.line += 1;
            self.location.column = 1;
        }
        else
        {
            self.location.column += 1;
        }
    }
}
