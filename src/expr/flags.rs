use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One of the nine metadata slots an expression reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Group,
    Name,
    Title,
    XLabel,
    YLabel,
    ZLabel,
    Legend,
    Path,
    Origin,
}

impl Field {
    pub const COUNT: usize = 9;

    pub const ALL: [Field; Self::COUNT] = [
        Field::Group,
        Field::Name,
        Field::Title,
        Field::XLabel,
        Field::YLabel,
        Field::ZLabel,
        Field::Legend,
        Field::Path,
        Field::Origin,
    ];

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'g' => Some(Self::Group),
            'n' => Some(Self::Name),
            't' => Some(Self::Title),
            'x' => Some(Self::XLabel),
            'y' => Some(Self::YLabel),
            'z' => Some(Self::ZLabel),
            'l' => Some(Self::Legend),
            'd' => Some(Self::Path),
            'f' => Some(Self::Origin),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Group => 'g',
            Self::Name => 'n',
            Self::Title => 't',
            Self::XLabel => 'x',
            Self::YLabel => 'y',
            Self::ZLabel => 'z',
            Self::Legend => 'l',
            Self::Path => 'd',
            Self::Origin => 'f',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddMode {
    #[default]
    None,
    Prepend,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flags {
    pub select: bool,
    pub invert: bool,
    pub match_only: bool,
    pub print: bool,
    pub add: AddMode,
    pub from: Field,
    pub to: Field,
    /// Version of `from` to read, negative values count from the latest.
    pub from_index: i8,
    pub match_index: i8,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            select: false,
            invert: false,
            match_only: false,
            print: false,
            add: AddMode::None,
            from: Field::Group,
            to: Field::Group,
            from_index: -1,
            match_index: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("'{0}' must precede field letters and '+'")]
    Misplaced(char),

    #[error("too many field flags")]
    TooManyFields,

    #[error("'+' before any field letter")]
    AddBeforeField,

    #[error("repeated '+'")]
    RepeatedAdd,

    #[error("index directly after '+'")]
    IndexAfterAdd,

    #[error("index after second field letter")]
    IndexAfterSecondField,

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error("index {0} out of bound")]
    IndexOutOfBound(i64),

    #[error("unrecognized flag '{0}'")]
    Unrecognized(char),
}

/// Decode a complete flag run. The caller bounds the run; every character in
/// it must be a flag.
pub fn decode(run: &str) -> Result<Flags, FlagError> {
    let mut flags = Flags::default();
    let mut from: Option<Field> = None;
    let mut to: Option<Field> = None;
    let mut after_add = false;

    let bytes = run.as_bytes();
    let mut position = 0;
    while position < bytes.len() {
        let c = char::from(bytes[position]);
        position += 1;

        if let Some(field) = Field::from_letter(c) {
            if from.is_none() {
                from = Some(field);
            } else if to.is_none() {
                to = Some(field);
            } else {
                return Err(FlagError::TooManyFields);
            }
            after_add = false;
            continue;
        }

        match c {
            's' | 'i' | 'm' | 'p' => {
                if from.is_some() || flags.add != AddMode::None {
                    return Err(FlagError::Misplaced(c));
                }
                match c {
                    's' => flags.select = true,
                    'i' => flags.invert = true,
                    'm' => flags.match_only = true,
                    _ => flags.print = true,
                }
            }
            '+' => {
                if flags.add != AddMode::None {
                    return Err(FlagError::RepeatedAdd);
                }
                flags.add = match (from, to) {
                    (None, _) => return Err(FlagError::AddBeforeField),
                    (Some(_), None) => AddMode::Prepend,
                    (Some(_), Some(_)) => AddMode::Append,
                };
                after_add = true;
            }
            '-' | '0'..='9' => {
                if after_add {
                    return Err(FlagError::IndexAfterAdd);
                }
                if to.is_some() {
                    return Err(FlagError::IndexAfterSecondField);
                }
                let start = position - 1;
                while position < bytes.len()
                    && (bytes[position].is_ascii_digit() || bytes[position] == b'-')
                {
                    position += 1;
                }
                let literal = &run[start..position];
                let number: i64 = literal
                    .parse()
                    .map_err(|_| FlagError::InvalidNumber(literal.to_string()))?;
                let index = i8::try_from(number).map_err(|_| FlagError::IndexOutOfBound(number))?;
                if from.is_none() {
                    flags.match_index = index;
                } else {
                    flags.from_index = index;
                }
            }
            other => return Err(FlagError::Unrecognized(other)),
        }
    }

    flags.from = from.unwrap_or(Field::Group);
    flags.to = to.unwrap_or(flags.from);
    Ok(flags)
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.select {
            f.write_str("s")?;
        }
        if self.invert {
            f.write_str("i")?;
        }
        if self.match_only {
            f.write_str("m")?;
        }
        if self.print {
            f.write_str("p")?;
        }
        if self.match_index != 0 {
            write!(f, "{}", self.match_index)?;
        }
        write!(f, "{}", self.from)?;
        if self.from_index != -1 {
            write!(f, "{}", self.from_index)?;
        }
        if self.add == AddMode::Prepend {
            f.write_str("+")?;
        }
        if self.to != self.from || self.add == AddMode::Append {
            write!(f, "{}", self.to)?;
        }
        if self.add == AddMode::Append {
            f.write_str("+")?;
        }
        Ok(())
    }
}
