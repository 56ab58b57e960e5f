use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fundamental_analysis::SystemAnalysisEngine;

use crate::commands;
use crate::config::{InsightConfig, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "equity-insight",
    about = "Score a company's quarterly fundamentals by archetype",
    version
)]
struct Cli {
    /// Output format, overriding INSIGHT_OUTPUT
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,
    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one quarter, optionally against the previous one
    Analyze(AnalyzeArgs),
    /// Score every quarter of a company's history
    Series(SeriesArgs),
    /// List the supported company archetypes
    Archetypes,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Request file, or `-` for stdin
    input: String,
    /// Also emit the narrative-generation context
    #[arg(long)]
    prompt_context: bool,
}

#[derive(Args, Debug)]
struct SeriesArgs {
    /// Request file, or `-` for stdin
    input: String,
}

pub fn run(config: InsightConfig) -> Result<()> {
    let cli = Cli::parse();
    let config = config.with_overrides(cli.output, cli.compact);
    let engine = SystemAnalysisEngine::new();

    let output = match cli.command {
        Command::Analyze(args) => {
            let body = commands::read_input(&args.input)?;
            commands::analyze(&engine, &body, args.prompt_context, &config)?
        }
        Command::Series(args) => {
            let body = commands::read_input(&args.input)?;
            commands::series(&engine, &body, &config)?
        }
        Command::Archetypes => commands::archetypes(&config)?,
    };

    println!("{output}");
    Ok(())
}
