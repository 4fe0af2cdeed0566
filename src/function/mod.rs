use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::args::{ArgError, RawArgs};
use crate::error::HedError;
use crate::target::{Canvas, Histogram};

mod canvas;
mod histogram;

/// Closure produced by a factory, applied to a target at evaluation time.
pub type Action<T> = Box<dyn Fn(&mut T)>;

pub type Factory<T> = fn(RawArgs<'_>) -> Result<Action<T>, ArgError>;

/// A resolved function call: the closure plus the text it was built from.
pub struct BoundFunction<T> {
    name: String,
    args: String,
    action: Action<T>,
}

impl<T> BoundFunction<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &str {
        &self.args
    }

    pub fn call(&self, target: &mut T) {
        (self.action)(target);
    }
}

impl<T> fmt::Debug for BoundFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundFunction")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for BoundFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} {}", self.name, self.args)
        }
    }
}

struct Entry<T> {
    signature: &'static str,
    factory: Factory<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub signature: &'static str,
}

/// Immutable name to factory table for one target type.
pub struct FunctionRegistry<T> {
    delimiter: char,
    entries: BTreeMap<&'static str, Entry<T>>,
}

impl<T> FunctionRegistry<T> {
    pub fn builder(delimiter: char) -> RegistryBuilder<T> {
        RegistryBuilder {
            delimiter,
            entries: BTreeMap::new(),
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn signatures(&self) -> Vec<FunctionSignature> {
        self.entries
            .iter()
            .map(|(&name, entry)| FunctionSignature {
                name,
                signature: entry.signature,
            })
            .collect()
    }

    pub fn make(&self, name: &str, args: &str) -> Result<BoundFunction<T>, HedError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| HedError::UnknownFunction {
                name: name.to_string(),
                args: args.to_string(),
            })?;
        let action = (entry.factory)(RawArgs::new(args, self.delimiter)).map_err(|source| {
            HedError::FunctionArguments {
                name: name.to_string(),
                args: args.to_string(),
                source,
            }
        })?;
        Ok(BoundFunction {
            name: name.to_string(),
            args: args.to_string(),
            action,
        })
    }
}

pub struct RegistryBuilder<T> {
    delimiter: char,
    entries: BTreeMap<&'static str, Entry<T>>,
}

impl<T> RegistryBuilder<T> {
    /// Add a factory. Names must be unique within a registry.
    pub fn register(
        mut self,
        name: &'static str,
        signature: &'static str,
        factory: Factory<T>,
    ) -> Result<Self, HedError> {
        if self.entries.contains_key(name) {
            return Err(HedError::InvalidRequest {
                message: format!("function '{name}' registered twice"),
            });
        }
        self.entries.insert(name, Entry { signature, factory });
        Ok(self)
    }

    pub fn build(self) -> FunctionRegistry<T> {
        FunctionRegistry {
            delimiter: self.delimiter,
            entries: self.entries,
        }
    }
}

/// Every registry the expression parser resolves against.
pub struct Functions {
    pub histogram: FunctionRegistry<Histogram>,
    pub canvas: FunctionRegistry<Canvas>,
}

impl Functions {
    pub fn builtin() -> Result<Self, HedError> {
        Ok(Self {
            histogram: histogram::registry()?,
            canvas: canvas::registry()?,
        })
    }
}

/// Parse an axis letter string, accepting only letters from `allowed`.
fn axis_letters(function: &str, axes: &str, allowed: &str) -> Result<Vec<char>, ArgError> {
    axes.chars()
        .map(|letter| {
            let lower = letter.to_ascii_lowercase();
            if allowed.contains(lower) {
                Ok(lower)
            } else {
                Err(ArgError::Invalid {
                    message: format!("{function}: invalid axis \"{letter}\""),
                })
            }
        })
        .collect()
}
