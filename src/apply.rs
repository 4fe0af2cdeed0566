use serde::Serialize;
use tracing::{debug, info};

use crate::error::HedError;
use crate::expr::{AddMode, Expression, Field, Payload, SharedStr};
use crate::target::Subject;

mod fields;

use fields::FieldStore;

/// Fields copied back onto the subject when an expression edited them.
const WRITABLE_FIELDS: [Field; 5] = [
    Field::Title,
    Field::XLabel,
    Field::YLabel,
    Field::ZLabel,
    Field::Legend,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub accepted: bool,
    pub group: String,
}

impl Outcome {
    fn rejected() -> Self {
        Self {
            accepted: false,
            group: String::new(),
        }
    }
}

/// Run `exprs` against `subject` with a fresh field store.
///
/// A failed `select` expression rejects the subject without touching it. An
/// out-of-range version index aborts with an error.
pub fn evaluate<S: Subject>(exprs: &[Expression], subject: &mut S) -> Result<Outcome, HedError> {
    if exprs.is_empty() {
        return Ok(Outcome {
            accepted: true,
            group: subject.intrinsic(Field::Name),
        });
    }

    let mut walk = Walk {
        store: FieldStore::default(),
        subject,
    };
    if !walk.run(exprs, 0)? {
        return Ok(Outcome::rejected());
    }

    let group = resolve_group(&walk.store, &*walk.subject);
    for field in WRITABLE_FIELDS {
        if let Some(value) = walk.store.appended(field) {
            walk.subject.assign(field, value);
        }
    }
    Ok(Outcome {
        accepted: true,
        group,
    })
}

/// Latest written group, else latest written name, else the intrinsic name.
fn resolve_group<S: Subject + ?Sized>(store: &FieldStore, subject: &S) -> String {
    store
        .appended(Field::Group)
        .or_else(|| store.appended(Field::Name))
        .map(|value| value.to_string())
        .unwrap_or_else(|| subject.intrinsic(Field::Name))
}

struct Walk<'s, S> {
    store: FieldStore,
    subject: &'s mut S,
}

impl<S: Subject> Walk<'_, S> {
    /// Returns false when a `select` expression at any depth fails.
    fn run(&mut self, exprs: &[Expression], level: usize) -> Result<bool, HedError> {
        for expr in exprs {
            let flags = &expr.flags;
            let source = self.store.get(flags.from, flags.from_index, &*self.subject)?;

            let Some(mut result) = expr.rewrite(&source) else {
                debug!(level, expression = %expr, value = %source, "not matched");
                if flags.print {
                    info!(
                        target: "hed::print",
                        expression = %expr,
                        input = %source,
                        "not matched"
                    );
                }
                if flags.select {
                    return Ok(false);
                }
                continue;
            };

            match flags.add {
                AddMode::None => {}
                AddMode::Prepend => {
                    let prior = self.store.latest(flags.to, &*self.subject);
                    result = SharedStr::from(format!("{result}{prior}"));
                }
                AddMode::Append => {
                    let prior = self.store.latest(flags.to, &*self.subject);
                    result = SharedStr::from(format!("{prior}{result}"));
                }
            }

            let changed = flags.to != flags.from || result != source;
            debug!(level, expression = %expr, value = %source, result = %result, "matched");
            if flags.print {
                info!(
                    target: "hed::print",
                    expression = %expr,
                    input = %source,
                    output = %result,
                    "matched"
                );
            }
            if changed {
                self.store.push(flags.to, result, &*self.subject);
            }

            match &expr.payload {
                Payload::None => {}
                Payload::Exprs(children) => {
                    if !self.run(children, level + 1)? {
                        return Ok(false);
                    }
                }
                Payload::Histogram(function) => self.subject.apply_histogram(function),
                Payload::Canvas(function) => self.subject.apply_canvas(function),
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests;
