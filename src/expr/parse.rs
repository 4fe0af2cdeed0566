use regex::Regex;
use tracing::debug;

use crate::error::HedError;
use crate::function::Functions;

use super::clause::{
    flag_run_end, is_blank, is_delimiter, is_separator, matching_brace, next_unescaped,
    substitution_end, unescape_substitution,
};
use super::flags::{Flags, decode};
use super::{Expression, Payload, SharedStr};

/// Which registries a function call may resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Histogram,
    /// Histogram functions first, canvas functions when that fails.
    HistogramThenCanvas,
}

pub struct Parser<'f> {
    functions: &'f Functions,
    resolution: Resolution,
}

impl<'f> Parser<'f> {
    pub fn new(functions: &'f Functions, resolution: Resolution) -> Self {
        Self {
            functions,
            resolution,
        }
    }

    pub fn parse_list(&self, text: &str) -> Result<Vec<Expression>, HedError> {
        let mut position = 0;
        let mut exprs = Vec::new();
        while let Some(expr) = self.parse(text, &mut position)? {
            exprs.push(expr);
        }
        Ok(exprs)
    }

    /// Parse one expression starting at `*position` and advance past it.
    /// Returns `None` once only blanks and separators remain.
    pub fn parse(
        &self,
        text: &str,
        position: &mut usize,
    ) -> Result<Option<Expression>, HedError> {
        let bytes = text.as_bytes();
        let mut pos = *position;
        while pos < bytes.len() && (is_blank(bytes[pos]) || is_separator(bytes[pos])) {
            pos += 1;
        }
        if pos >= bytes.len() {
            *position = pos;
            return Ok(None);
        }
        let start = pos;

        let run_end = flag_run_end(bytes, pos);
        let run = &text[pos..run_end];
        let flags = match decode(run) {
            Ok(flags) => {
                pos = run_end;
                flags
            }
            Err(source) => match bytes.get(run_end) {
                Some(&byte) if is_delimiter(byte) || byte == b'{' => {
                    return Err(HedError::InvalidFlags {
                        flags: run.to_string(),
                        source,
                    });
                }
                // Not a flag run; the text is a bare function call.
                _ => Flags::default(),
            },
        };

        let mut regex = None;
        let mut substitution = None;
        if pos < bytes.len() && is_delimiter(bytes[pos]) {
            let delimiter = char::from(bytes[pos]);
            let close = next_unescaped(bytes, pos).ok_or_else(|| HedError::UnterminatedDelimiter {
                delimiter,
                expression: text[start..].to_string(),
            })?;

            let pattern = &text[pos + 1..close];
            if !pattern.is_empty() {
                regex = Some(Regex::new(pattern).map_err(|source| HedError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                })?);
            }

            pos = match substitution_end(bytes, close) {
                Some(end) => {
                    let template = unescape_substitution(&text[close + 1..end], delimiter);
                    substitution = Some(SharedStr::from(template));
                    end + 1
                }
                None => close + 1,
            };
        }

        while pos < bytes.len() && is_blank(bytes[pos]) {
            pos += 1;
        }

        let payload = if pos >= bytes.len() || is_separator(bytes[pos]) {
            Payload::None
        } else if bytes[pos] == b'{' {
            let close = matching_brace(bytes, pos).ok_or_else(|| HedError::UnmatchedBrace {
                expression: text[start..].to_string(),
            })?;
            let inner = text[pos + 1..close].trim_end_matches([' ', '\t', ';', '\n', '\r']);
            let children = self.parse_list(inner)?;
            pos = close + 1;
            Payload::Exprs(children)
        } else {
            let end = bytes[pos..]
                .iter()
                .position(|&byte| is_separator(byte))
                .map_or(bytes.len(), |offset| pos + offset);
            let call = text[pos..end].trim_end();
            let (name, args) = call.split_once(' ').unwrap_or((call, ""));
            pos = end;
            self.resolve_function(name, args)?
        };

        *position = pos;
        let expr = Expression {
            flags,
            regex,
            substitution,
            payload,
        };
        debug!(expression = %expr, "parsed expression");
        Ok(Some(expr))
    }

    fn resolve_function(&self, name: &str, args: &str) -> Result<Payload, HedError> {
        let histogram = self.functions.histogram.make(name, args);
        match (histogram, self.resolution) {
            (Ok(function), _) => Ok(Payload::Histogram(function)),
            (Err(_), Resolution::HistogramThenCanvas) if self.functions.canvas.contains(name) => {
                self.functions.canvas.make(name, args).map(Payload::Canvas)
            }
            (Err(error), _) => Err(error),
        }
    }
}
