use std::{ cmp::Ordering,
           fmt::{ self,
                  Debug,
                  Display,
                  Formatter } };
use crate::{ lang::code::{ quotation_source,
                           QuotationPtr },
             runtime::{ error::{ self,
                                 script_error,
                                 ErrorKind },
                        interpreter::Interpreter } };



/// Every kind of data that can live on the Brief stack.
#[derive(Clone)]
pub enum Value
{
    Int(i64),

    Float(f64),

    Bool(bool),

    /// A string value.  Displayed raw, use to_source to get a quoted and escaped version.
    String(String),

    /// A quotation pushed as data.  Lists are shared and never modified in place, list words build
    /// new ones instead.
    List(QuotationPtr)
}


/// Convert an arbitrary data type to a Value.
pub trait ToValue
{
    fn to_value(&self) -> Value;
}


/// Values compare the way the language's `=` word sees them.  Numbers compare by value across the
/// numeric types, and numbers compare with strings by their text.  Lists compare element by
/// element.
impl PartialEq for Value
{
    fn eq(&self, other: &Value) -> bool
    {
        if Value::both_are_numeric(self, other)
        {
            if Value::either_is_float(self, other)
            {
                self.get_float_val() == other.get_float_val()
            }
            else if Value::either_is_int(self, other)
            {
                self.get_int_val() == other.get_int_val()
            }
            else
            {
                self.get_bool_val() == other.get_bool_val()
            }
        }
        else if self.is_stringable() && other.is_stringable()
        {
            self.get_string_val() == other.get_string_val()
        }
        else
        {
            match ( self, other )
            {
                ( Value::List(a), Value::List(b) ) => a == b,
                _                                  => false
            }
        }
    }
}


/// Ordering is only defined between numbers and between strings.
impl PartialOrd for Value
{
    fn partial_cmp(&self, other: &Value) -> Option<Ordering>
    {
        if Value::both_are_numeric(self, other)
        {
            if Value::either_is_float(self, other)
            {
                self.get_float_val().partial_cmp(&other.get_float_val())
            }
            else
            {
                self.get_int_val().partial_cmp(&other.get_int_val())
            }
        }
        else
        {
            match ( self, other )
            {
                ( Value::String(a), Value::String(b) ) => a.partial_cmp(b),
                _                                      => None
            }
        }
    }
}


impl Display for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match self
        {
            Value::Int(value)    => write!(f, "{}", value),
            Value::Float(value)  => write_float(f, *value),
            Value::Bool(value)   => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::List(value)   => write!(f, "{}", quotation_source(value))
        }
    }
}


/// Floats are written without an exponent and always with a fraction, so they read back as floats.
fn write_float(f: &mut Formatter, value: f64) -> fmt::Result
{
    if value.is_finite() && value.fract() == 0.0
    {
        write!(f, "{:.1}", value)
    }
    else
    {
        write!(f, "{}", value)
    }
}


impl Debug for Value
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{}", self.to_source())
    }
}


/// Define implementations for converting between Values and the raw data types they represent.
/// Given an accessor name, also define a checked accessor for the raw data.
macro_rules! value_conversion
{
    ($data_type:ty , $variant:ident , $as_ident:ident , $type_name:literal) =>
    {
        value_conversion!($data_type, $variant);

        impl Value
        {
            #[doc = concat!("Get the ", $type_name, " held by the value, or raise a type error.")]
            pub fn $as_ident(&self, interpreter: &dyn Interpreter) -> error::Result<&$data_type>
            {
                match self
                {
                    Value::$variant(value) => Ok(value),
                    _ => script_error(interpreter,
                                      ErrorKind::TypeMismatch { expected: $type_name,
                                                                found: self.describe() })
                }
            }
        }
    };

    ($data_type:ty , $variant:ident) =>
    {
        impl ToValue for $data_type
        {
            fn to_value(&self) -> Value
            {
                Value::$variant(self.clone())
            }
        }


        impl From<$data_type> for Value
        {
            fn from(original: $data_type) -> Value
            {
                Value::$variant(original)
            }
        }
    };
}


value_conversion!(i64,          Int,    as_int,    "int");
value_conversion!(f64,          Float);
value_conversion!(bool,         Bool);
value_conversion!(String,       String, as_string, "string");
value_conversion!(QuotationPtr, List,   as_list,   "list");


/// Lengths and counts are pushed as plain integers.
impl ToValue for usize
{
    fn to_value(&self) -> Value
    {
        Value::Int(*self as i64)
    }
}


impl From<&str> for Value
{
    fn from(original: &str) -> Value
    {
        Value::String(original.to_string())
    }
}


/// Handily implement variant checks for the types the Value enumeration supports.  Given a second
/// name, also define a check over a pair of values.
macro_rules! is_variant
{
    ($name:ident , $variant:ident) =>
    {
        #[doc = concat!("Check if the value is the variant ", stringify!($variant), ".")]
        pub fn $name(&self) -> bool
        {
            matches!(self, Value::$variant(_))
        }
    };

    ($name:ident , $either_name:ident , $variant:ident) =>
    {
        is_variant!($name, $variant);

        #[doc = concat!("Check if either of the two values are the variant ",
                        stringify!($variant),
                        ".")]
        pub fn $either_name(a: &Value, b: &Value) -> bool
        {
            a.$name() || b.$name()
        }
    };
}


impl Value
{
    is_variant!(is_int,    either_is_int,    Int);
    is_variant!(is_float,  either_is_float,  Float);
    is_variant!(is_string, String);


    /// Booleans count as numbers, the same way true and false are 1 and 0 in arithmetic.
    pub fn is_numeric(&self) -> bool
    {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Bool(_))
    }


    pub fn both_are_numeric(a: &Value, b: &Value) -> bool
    {
        a.is_numeric() && b.is_numeric()
    }


    // Does the Value represent a simply stringable type?
    pub fn is_stringable(&self) -> bool
    {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::String(_))
    }


    /// The text of the value.  Strings are returned raw, everything else as it would be displayed.
    pub fn get_string_val(&self) -> String
    {
        match self
        {
            Value::String(value) => value.clone(),
            _                    => self.to_string()
        }
    }


    /// Truthiness of a value.  Zero, false and the empty string are false, everything else is
    /// true.
    pub fn get_bool_val(&self) -> bool
    {
        match self
        {
            Value::Int(value)    => *value != 0,
            Value::Float(value)  => *value != 0.0,
            Value::Bool(value)   => *value,
            Value::String(value) => !value.is_empty(),
            Value::List(_)       => true
        }
    }


    /// Only meaningful for values that pass is_numeric().
    pub fn get_int_val(&self) -> i64
    {
        match self
        {
            Value::Int(value)   => *value,
            Value::Float(value) => *value as i64,
            Value::Bool(value)  => if *value { 1 } else { 0 },
            _                   => 0
        }
    }


    /// Only meaningful for values that pass is_numeric().
    pub fn get_float_val(&self) -> f64
    {
        match self
        {
            Value::Int(value)   => *value as f64,
            Value::Float(value) => *value,
            Value::Bool(value)  => if *value { 1.0 } else { 0.0 },
            _                   => 0.0
        }
    }


    /// A short name for the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str
    {
        match self
        {
            Value::Int(_)    => "int",
            Value::Float(_)  => "float",
            Value::Bool(_)   => "bool",
            Value::String(_) => "string",
            Value::List(_)   => "list"
        }
    }


    /// The type and source text of the value, for error messages.
    pub fn describe(&self) -> String
    {
        format!("{} {}", self.type_name(), self.to_source())
    }


    /// Text that parses back into an equal value.  Strings are quoted and escaped.
    pub fn to_source(&self) -> String
    {
        match self
        {
            Value::String(value) => Value::stringify(value),
            _                    => self.to_string()
        }
    }


    /// Convert a string to a string that could be used directly within source code.  Special
    /// characters are converted to escape sequences and the string is enclosed in double quotes.
    pub fn stringify(text: &str) -> String
    {
        let mut result = String::with_capacity(text.len() + 2);

        result.push('"');

        for character in text.chars()
        {
            match character
            {
                '"'  => result.push_str("\\\""),
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                '\\' => result.push_str("\\\\"),
                _    => result.push(character)
            }
        }

        result.push('"');

        result
    }
}
