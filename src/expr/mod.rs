use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::function::BoundFunction;
use crate::target::{Canvas, Histogram};

mod clause;
mod flags;
mod parse;

pub use flags::{AddMode, Field, FlagError, Flags, decode as decode_flags};
pub use parse::{Parser, Resolution};

/// Immutable shared string used for field versions and substitutions.
pub type SharedStr = Rc<str>;

pub type HistogramFunction = BoundFunction<Histogram>;
pub type CanvasFunction = BoundFunction<Canvas>;

/// What a matched expression does besides rewriting a field.
pub enum Payload {
    None,
    Exprs(Vec<Expression>),
    Histogram(HistogramFunction),
    Canvas(CanvasFunction),
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Exprs(_) => "exprs",
            Self::Histogram(_) => "histogram_function",
            Self::Canvas(_) => "canvas_function",
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Exprs(exprs) => f.debug_tuple("Exprs").field(exprs).finish(),
            Self::Histogram(function) => f.debug_tuple("Histogram").field(function).finish(),
            Self::Canvas(function) => f.debug_tuple("Canvas").field(function).finish(),
        }
    }
}

#[derive(Debug)]
pub struct Expression {
    pub flags: Flags,
    pub regex: Option<Regex>,
    pub substitution: Option<SharedStr>,
    pub payload: Payload,
}

impl Expression {
    /// Run the regex clause against `source`.
    ///
    /// Returns `None` when the expression fails for this input. Add mode is
    /// not applied here since it depends on the destination field.
    pub fn rewrite(&self, source: &SharedStr) -> Option<SharedStr> {
        let Some(regex) = &self.regex else {
            return Some(self.substitution.clone().unwrap_or_else(|| source.clone()));
        };

        if regex.is_match(source) == self.flags.invert {
            return None;
        }

        match &self.substitution {
            Some(template) if !self.flags.invert => {
                Some(SharedStr::from(self.substitute(regex, source, template)))
            }
            _ => Some(source.clone()),
        }
    }

    fn substitute(&self, regex: &Regex, source: &str, template: &str) -> String {
        let total = if self.flags.match_only && self.flags.match_index < 0 {
            regex.find_iter(source).count()
        } else {
            0
        };

        let mut output = String::with_capacity(source.len());
        let mut last = 0;
        for (offset, captures) in regex.captures_iter(source).enumerate() {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            output.push_str(&source[last..whole.start()]);
            if self.substitutes_occurrence(offset + 1, total) {
                captures.expand(template, &mut output);
            } else {
                output.push_str(whole.as_str());
            }
            last = whole.end();
        }
        output.push_str(&source[last..]);
        output
    }

    /// Whether the 1-based `occurrence` out of `total` gets substituted.
    fn substitutes_occurrence(&self, occurrence: usize, total: usize) -> bool {
        let index = i64::from(self.flags.match_index);
        let occurrence = occurrence as i64;
        if self.flags.match_only {
            match index {
                0 => false,
                index if index > 0 => occurrence == index,
                index => occurrence == total as i64 + 1 + index,
            }
        } else {
            match index {
                0 => true,
                index if index > 0 => occurrence > index,
                index => occurrence <= -index,
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flags)?;
        if self.regex.is_some() || self.substitution.is_some() {
            let pattern = self.regex.as_ref().map_or("", Regex::as_str);
            write!(f, "/{pattern}/")?;
            if let Some(substitution) = &self.substitution {
                write!(f, "{substitution}/")?;
            }
        }
        match &self.payload {
            Payload::None => Ok(()),
            Payload::Exprs(exprs) => {
                f.write_str(" {")?;
                for (index, expr) in exprs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, " {expr}")?;
                }
                f.write_str(" }")
            }
            Payload::Histogram(function) => write!(f, " {function}"),
            Payload::Canvas(function) => write!(f, " {function}"),
        }
    }
}
