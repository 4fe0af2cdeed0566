use clap::Args;
use serde::Serialize;

use crate::error::HedError;
use crate::expr::{Expression, Flags, Parser, Payload, Resolution};
use crate::function::Functions;

#[derive(Debug, Args)]
pub struct ParseArgs {
    #[arg(
        short = 'g',
        long = "canvas",
        help = "Parse as canvas expressions (canvas functions allowed)"
    )]
    pub canvas: bool,
    #[arg(
        value_name = "EXPR",
        required = true,
        num_args = 1..,
        help = "Expression text; each argument may hold several expressions"
    )]
    pub exprs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub expressions: Vec<ExpressionSummary>,
}

#[derive(Debug, Serialize)]
pub struct ExpressionSummary {
    pub normalized: String,
    pub flags: Flags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution: Option<String>,
    pub payload: PayloadSummary,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PayloadSummary {
    None,
    Exprs { children: Vec<ExpressionSummary> },
    HistogramFunction { name: String, args: String },
    CanvasFunction { name: String, args: String },
}

impl From<&Expression> for ExpressionSummary {
    fn from(expr: &Expression) -> Self {
        let payload = match &expr.payload {
            Payload::None => PayloadSummary::None,
            Payload::Exprs(children) => PayloadSummary::Exprs {
                children: children.iter().map(Self::from).collect(),
            },
            Payload::Histogram(function) => PayloadSummary::HistogramFunction {
                name: function.name().to_string(),
                args: function.args().to_string(),
            },
            Payload::Canvas(function) => PayloadSummary::CanvasFunction {
                name: function.name().to_string(),
                args: function.args().to_string(),
            },
        };
        Self {
            normalized: expr.to_string(),
            flags: expr.flags,
            regex: expr.regex.as_ref().map(|regex| regex.as_str().to_string()),
            substitution: expr.substitution.as_deref().map(ToString::to_string),
            payload,
        }
    }
}

pub fn run_parse(args: ParseArgs) -> Result<ParseResponse, HedError> {
    let functions = Functions::builtin()?;
    let resolution = if args.canvas {
        Resolution::HistogramThenCanvas
    } else {
        Resolution::Histogram
    };
    let parser = Parser::new(&functions, resolution);

    let mut expressions = Vec::new();
    for text in &args.exprs {
        for expr in parser.parse_list(text)? {
            expressions.push(ExpressionSummary::from(&expr));
        }
    }
    Ok(ParseResponse { expressions })
}
