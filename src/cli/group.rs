use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::apply::evaluate;
use crate::args::parse_list;
use crate::config::Config;
use crate::document::load_histograms;
use crate::error::HedError;
use crate::expr::{Expression, Parser, Resolution};
use crate::function::Functions;
use crate::group::{GroupMap, Palette};
use crate::target::{Canvas, CanvasSubject, Histogram};

#[derive(Debug, Args)]
pub struct GroupArgs {
    #[arg(
        short = 'e',
        long = "expr",
        value_name = "EXPR",
        help = "Histogram expression text (repeatable)"
    )]
    pub exprs: Vec<String>,
    #[arg(
        short = 'g',
        long = "canvas-expr",
        value_name = "EXPR",
        help = "Canvas expression text (repeatable)"
    )]
    pub canvas_exprs: Vec<String>,
    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the JSON response to FILE instead of stdout"
    )]
    pub output: Option<PathBuf>,
    #[arg(long, help = "Sort groups alphabetically")]
    pub sort: bool,
    #[arg(
        long,
        value_name = "LIST",
        help = "Comma-separated color palette applied by position within each group"
    )]
    pub colors: Option<String>,
    #[arg(
        long,
        value_name = "FILE",
        help = "TOML configuration file (default: $HED_CONFIG)"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        value_name = "INPUT",
        required = true,
        num_args = 1..,
        help = "Input documents (.json, .yaml, .yml or .toml)"
    )]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub groups: Vec<GroupEntry>,
    pub summary: GroupSummary,
}

#[derive(Debug, Serialize)]
pub struct GroupEntry {
    pub group: String,
    pub canvas: Canvas,
    pub histograms: Vec<Histogram>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupSummary {
    pub files_scanned: usize,
    pub histograms_scanned: usize,
    pub histograms_selected: usize,
    pub groups: usize,
}

#[derive(Debug, Serialize)]
pub struct WrittenResponse {
    pub output: PathBuf,
    pub summary: GroupSummary,
}

pub enum GroupCommandOutput {
    Json(GroupResponse),
    Written(WrittenResponse),
}

pub fn run_group(args: GroupArgs) -> Result<GroupCommandOutput, HedError> {
    let config = Config::resolve(args.config.as_deref())?;
    let functions = Functions::builtin()?;

    let exprs = parse_all(
        &Parser::new(&functions, Resolution::Histogram),
        config.exprs.iter().chain(&args.exprs),
    )?;
    let canvas_exprs = parse_all(
        &Parser::new(&functions, Resolution::HistogramThenCanvas),
        config.canvas_exprs.iter().chain(&args.canvas_exprs),
    )?;

    let palette = match &args.colors {
        Some(list) => Palette::new(parse_list::<Vec<i16>>(list, ',').map_err(|error| {
            HedError::InvalidRequest {
                message: format!("--colors: {error}"),
            }
        })?),
        None => Palette::new(config.colors.clone()),
    };

    let mut summary = GroupSummary::default();
    let mut map = GroupMap::default();
    for input in &args.inputs {
        info!(input = %input.display(), "reading input");
        let histograms = load_histograms(input)?;
        summary.files_scanned += 1;

        for mut histogram in histograms {
            summary.histograms_scanned += 1;
            let outcome = evaluate(&exprs, &mut histogram)?;
            if !outcome.accepted {
                debug!(histogram = %histogram.name, "rejected");
                continue;
            }
            map.insert(outcome.group, histogram);
        }
    }

    summary.histograms_selected = map.histogram_count();
    if args.sort || config.sort {
        map.sort();
    }

    let groups = build_groups(map, &canvas_exprs, &palette)?;
    summary.groups = groups.len();
    info!(
        files = summary.files_scanned,
        selected = summary.histograms_selected,
        groups = summary.groups,
        "grouping finished"
    );

    let response = GroupResponse { groups, summary };
    match args.output {
        Some(output) => {
            let serialized = serde_json::to_string_pretty(&response)
                .map_err(|source| HedError::ResponseSerialization { source })?;
            std::fs::write(&output, serialized).map_err(|error| HedError::io(&output, error))?;
            Ok(GroupCommandOutput::Written(WrittenResponse {
                output,
                summary: response.summary,
            }))
        }
        None => Ok(GroupCommandOutput::Json(response)),
    }
}

fn parse_all<'a>(
    parser: &Parser<'_>,
    texts: impl Iterator<Item = &'a String>,
) -> Result<Vec<Expression>, HedError> {
    let mut exprs = Vec::new();
    for text in texts {
        exprs.extend(parser.parse_list(text)?);
    }
    Ok(exprs)
}

/// Run the canvas expressions over every group and paint the survivors.
fn build_groups(
    map: GroupMap,
    canvas_exprs: &[Expression],
    palette: &Palette,
) -> Result<Vec<GroupEntry>, HedError> {
    let mut groups = Vec::with_capacity(map.len());
    for (key, mut histograms) in map.into_groups() {
        let mut canvas = Canvas::default();
        let outcome = evaluate(
            canvas_exprs,
            &mut CanvasSubject {
                canvas: &mut canvas,
                key: &key,
                histograms: &mut histograms,
            },
        )?;
        if !outcome.accepted {
            debug!(group = %key, "group rejected by canvas expressions");
            continue;
        }
        palette.paint(&mut histograms);
        groups.push(GroupEntry {
            group: outcome.group,
            canvas,
            histograms,
        });
    }
    Ok(groups)
}
