use clap::Args;
use serde::Serialize;

use crate::error::HedError;
use crate::function::{FunctionSignature, Functions};

#[derive(Debug, Args)]
pub struct FunctionsArgs {
    #[arg(long, help = "List canvas functions instead of histogram functions")]
    pub canvas: bool,
}

#[derive(Debug, Serialize)]
pub struct FunctionsResponse {
    pub target: &'static str,
    pub delimiter: String,
    pub functions: Vec<FunctionSignature>,
}

pub fn run_functions(args: FunctionsArgs) -> Result<FunctionsResponse, HedError> {
    let functions = Functions::builtin()?;
    let response = if args.canvas {
        FunctionsResponse {
            target: "canvas",
            delimiter: functions.canvas.delimiter().to_string(),
            functions: functions.canvas.signatures(),
        }
    } else {
        FunctionsResponse {
            target: "histogram",
            delimiter: functions.histogram.delimiter().to_string(),
            functions: functions.histogram.signatures(),
        }
    };
    Ok(response)
}
