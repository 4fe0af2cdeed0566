use clap::{Parser, Subcommand};

pub mod functions;
pub mod group;
pub mod parse;

#[derive(Debug, Parser)]
#[command(name = "hed")]
#[command(version)]
#[command(about = "Histogram metadata editor")]
#[command(
    long_about = "Rewrite histogram names, titles and axis labels with sed-like expressions, group the results and configure their canvases. Canonical flow: parse -> group."
)]
pub struct Cli {
    #[arg(
        short = 'v',
        long = "verbosity",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log detail on stderr (repeatable; RUST_LOG overrides)"
    )]
    pub verbosity: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Evaluate expressions over input documents and group the histograms")]
    Group(group::GroupArgs),
    #[command(about = "Parse expressions and print the normalized tree")]
    Parse(parse::ParseArgs),
    #[command(about = "List registered functions and their signatures")]
    Functions(functions::FunctionsArgs),
}
