//! Generic text to typed-value conversion.
//!
//! `ArgValue` converts one token into a value; `ArgTuple` binds a list of
//! positional tokens onto a tuple whose trailing elements may be optional.
//! Function factories and the command line (`--colors`) share these
//! conversions.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("too few arguments: expected at least {expected}, got {got}")]
    TooFew { expected: usize, got: usize },

    #[error("too many arguments: expected at most {expected}, got {got}")]
    TooMany { expected: usize, got: usize },

    #[error("\"{value}\" cannot be interpreted as {type_name}")]
    Convert { value: String, type_name: String },

    #[error("argument {position} is empty")]
    Empty { position: usize },

    #[error("{message}")]
    Invalid { message: String },
}

impl ArgError {
    fn convert<T: ArgValue>(value: &str) -> Self {
        Self::Convert {
            value: value.to_string(),
            type_name: T::describe(),
        }
    }
}

pub trait ArgValue: Sized {
    fn describe() -> String;

    fn from_arg(arg: &str) -> Result<Self, ArgError>;

    /// Fold another conversion into an existing value. Scalars are replaced,
    /// sequences grow.
    fn accumulate(&mut self, arg: &str) -> Result<(), ArgError> {
        *self = Self::from_arg(arg)?;
        Ok(())
    }
}

impl ArgValue for bool {
    fn describe() -> String {
        "bool".to_string()
    }

    fn from_arg(arg: &str) -> Result<Self, ArgError> {
        match arg.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "y" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ArgError::convert::<Self>(arg)),
        }
    }
}

impl ArgValue for String {
    fn describe() -> String {
        "string".to_string()
    }

    fn from_arg(arg: &str) -> Result<Self, ArgError> {
        Ok(arg.to_string())
    }
}

impl ArgValue for char {
    fn describe() -> String {
        "char".to_string()
    }

    fn from_arg(arg: &str) -> Result<Self, ArgError> {
        let mut chars = arg.chars();
        match (chars.next(), chars.next()) {
            (Some(value), None) => Ok(value),
            _ => Err(ArgError::convert::<Self>(arg)),
        }
    }
}

macro_rules! numeric_arg_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ArgValue for $ty {
                fn describe() -> String {
                    stringify!($ty).to_string()
                }

                fn from_arg(arg: &str) -> Result<Self, ArgError> {
                    arg.trim()
                        .parse::<$ty>()
                        .map_err(|_| ArgError::convert::<Self>(arg))
                }
            }
        )+
    };
}

numeric_arg_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: ArgValue> ArgValue for Option<T> {
    fn describe() -> String {
        T::describe()
    }

    fn from_arg(arg: &str) -> Result<Self, ArgError> {
        T::from_arg(arg).map(Some)
    }
}

impl<T: ArgValue> ArgValue for Vec<T> {
    fn describe() -> String {
        format!("list of {}", T::describe())
    }

    fn from_arg(arg: &str) -> Result<Self, ArgError> {
        Ok(vec![T::from_arg(arg)?])
    }

    fn accumulate(&mut self, arg: &str) -> Result<(), ArgError> {
        self.push(T::from_arg(arg)?);
        Ok(())
    }
}

/// Take the next `:`-separated component; the last tuple element keeps the
/// remainder of the text.
fn next_component<'a>(rest: &mut Option<&'a str>, last: bool) -> Option<&'a str> {
    let text = rest.take()?;
    if last {
        return Some(text);
    }
    match text.split_once(':') {
        Some((head, tail)) => {
            *rest = Some(tail);
            Some(head)
        }
        None => Some(text),
    }
}

macro_rules! tuple_arg_value {
    ($last:tt; $($name:ident : $index:tt),+) => {
        impl<$($name: ArgValue + Default),+> ArgValue for ($($name,)+) {
            fn describe() -> String {
                let parts: Vec<String> = vec![$($name::describe()),+];
                parts.join(":")
            }

            fn from_arg(arg: &str) -> Result<Self, ArgError> {
                let mut value = Self::default();
                let mut rest = Some(arg);
                $(
                    if let Some(component) = next_component(&mut rest, $index == $last) {
                        value.$index = $name::from_arg(component)?;
                    }
                )+
                Ok(value)
            }
        }
    };
}

tuple_arg_value!(1; A: 0, B: 1);
tuple_arg_value!(2; A: 0, B: 1, C: 2);
tuple_arg_value!(3; A: 0, B: 1, C: 2, D: 3);

/// Positional binding of tokens onto a tuple of `ArgValue`s.
pub trait ArgTuple: Sized {
    const ARITY: usize;

    /// Overwrite the leading `tokens.len()` elements of `base`. Empty tokens
    /// keep the element already in `base`.
    fn assign(base: Self, tokens: &[&str]) -> Result<Self, ArgError>;
}

impl ArgTuple for () {
    const ARITY: usize = 0;

    fn assign(base: Self, _tokens: &[&str]) -> Result<Self, ArgError> {
        Ok(base)
    }
}

macro_rules! arg_tuple {
    ($arity:expr; $($name:ident : $index:tt),+) => {
        impl<$($name: ArgValue),+> ArgTuple for ($($name,)+) {
            const ARITY: usize = $arity;

            fn assign(base: Self, tokens: &[&str]) -> Result<Self, ArgError> {
                let mut value = base;
                $(
                    if let Some(token) = tokens.get($index).filter(|token| !token.is_empty()) {
                        value.$index.accumulate(token)?;
                    }
                )+
                Ok(value)
            }
        }
    };
}

arg_tuple!(1; A: 0);
arg_tuple!(2; A: 0, B: 1);
arg_tuple!(3; A: 0, B: 1, C: 2);
arg_tuple!(4; A: 0, B: 1, C: 2, D: 3);
arg_tuple!(5; A: 0, B: 1, C: 2, D: 3, E: 4);
arg_tuple!(6; A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

/// Raw argument text of one function call together with the delimiter its
/// registry splits on.
#[derive(Debug, Clone, Copy)]
pub struct RawArgs<'a> {
    text: &'a str,
    delimiter: char,
}

impl<'a> RawArgs<'a> {
    pub fn new(text: &'a str, delimiter: char) -> Self {
        Self { text, delimiter }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn tokens(&self) -> Vec<&'a str> {
        split_tokens(self.text, self.delimiter)
    }

    /// Bind every element of `T` from the tokens; none are optional.
    pub fn bind<T: ArgTuple + Default>(&self) -> Result<T, ArgError> {
        self.bind_with_defaults(0, T::default())
    }

    /// Bind `T` where the last `optional` elements fall back to the values
    /// already present in `defaults`.
    pub fn bind_with_defaults<T: ArgTuple>(
        &self,
        optional: usize,
        defaults: T,
    ) -> Result<T, ArgError> {
        let tokens = self.tokens();
        let required = T::ARITY.saturating_sub(optional);
        if tokens.len() < required {
            return Err(ArgError::TooFew {
                expected: required,
                got: tokens.len(),
            });
        }
        if tokens.len() > T::ARITY {
            return Err(ArgError::TooMany {
                expected: T::ARITY,
                got: tokens.len(),
            });
        }
        if let Some(index) = tokens[..required].iter().position(|token| token.is_empty()) {
            return Err(ArgError::Empty { position: index + 1 });
        }
        T::assign(defaults, &tokens)
    }
}

/// Split on `delimiter` into trimmed positional tokens. Blank text has no
/// tokens; otherwise empty tokens keep their position. Runs of whitespace
/// count as one delimiter.
pub fn split_tokens(text: &str, delimiter: char) -> Vec<&str> {
    if delimiter.is_whitespace() {
        return text.split_whitespace().collect();
    }
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(delimiter).map(str::trim).collect()
}

/// Parse a delimited list into an accumulating value, as used for repeated
/// command line values.
pub fn parse_list<T: ArgValue + Default>(text: &str, delimiter: char) -> Result<T, ArgError> {
    let mut value = T::default();
    for token in split_tokens(text, delimiter)
        .into_iter()
        .filter(|token| !token.is_empty())
    {
        value.accumulate(token)?;
    }
    Ok(value)
}
