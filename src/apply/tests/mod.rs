use std::cell::Cell;

use crate::expr::{CanvasFunction, Expression, Field, HistogramFunction, Parser, Resolution};
use crate::function::Functions;
use crate::target::{Histogram, Subject};

mod properties;

fn parse(text: &str) -> Vec<Expression> {
    let functions = Functions::builtin().expect("builtin registries");
    Parser::new(&functions, Resolution::Histogram)
        .parse_list(text)
        .expect("expression should parse")
}

fn histogram(name: &str, title: &str) -> Histogram {
    Histogram {
        title: title.to_string(),
        ..Histogram::named(name)
    }
}

/// Histogram wrapper that counts function invocations.
struct Recording {
    histogram: Histogram,
    calls: Cell<usize>,
}

impl Recording {
    fn new(name: &str) -> Self {
        Self {
            histogram: Histogram::named(name),
            calls: Cell::new(0),
        }
    }
}

impl Subject for Recording {
    fn intrinsic(&self, field: Field) -> String {
        self.histogram.intrinsic(field)
    }

    fn assign(&mut self, field: Field, value: &str) {
        self.histogram.assign(field, value);
    }

    fn apply_histogram(&mut self, function: &HistogramFunction) {
        self.calls.set(self.calls.get() + 1);
        function.call(&mut self.histogram);
    }

    fn apply_canvas(&mut self, _function: &CanvasFunction) {}
}
