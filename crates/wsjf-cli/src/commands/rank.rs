//! Batch ranking and export of initiative files.

use std::path::{Path, PathBuf};

use clap::Args;
use wsjf_core::{Backlog, BatchInput, ReportExporter, ReportLayout, ReportOptions, WeightField};

use super::load_config;
use crate::table;

#[derive(Args)]
pub struct RankArgs {
    /// TOML or JSON file of initiatives
    #[arg(short, long)]
    input: PathBuf,
    /// Override a weight, e.g. --weight compliance=4 (repeatable)
    #[arg(short, long = "weight", value_parser = parse_weight_override)]
    weights: Vec<(WeightField, String)>,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// TOML or JSON file of initiatives
    #[arg(short, long)]
    input: PathBuf,
    /// Output file (default: <prefix>_<date>.pdf in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Report layout: table or plain
    #[arg(long)]
    layout: Option<ReportLayout>,
    /// Override a weight, e.g. --weight compliance=4 (repeatable)
    #[arg(short, long = "weight", value_parser = parse_weight_override)]
    weights: Vec<(WeightField, String)>,
}

/// Parse `field=value`. The value is kept raw so the usual 0 fallback applies.
pub fn parse_weight_override(s: &str) -> Result<(WeightField, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    let field = field.parse::<WeightField>().map_err(|e| e.to_string())?;
    Ok((field, value.trim().to_string()))
}

fn load_backlog(
    input: &Path,
    overrides: &[(WeightField, String)],
    config_path: Option<&Path>,
) -> Result<(Backlog, wsjf_core::Config), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let mut backlog = BatchInput::load(input)?.into_backlog(config.weights)?;
    if !overrides.is_empty() {
        let mut weights = *backlog.weights();
        for (field, raw) in overrides {
            weights.apply(*field, raw);
        }
        backlog.set_weights(weights);
    }
    Ok((backlog, config))
}

pub fn run_rank(args: RankArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (backlog, _) = load_backlog(&args.input, &args.weights, config_path)?;
    if args.json {
        let ranked: Vec<_> = backlog.initiatives().iter().collect();
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        print!("{}", table::render_weights(backlog.weights()));
        println!();
        print!("{}", table::render_initiatives(backlog.initiatives()));
    }
    Ok(())
}

pub fn run_export(args: ExportArgs, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let (mut backlog, config) = load_backlog(&args.input, &args.weights, config_path)?;
    let mut options = ReportOptions::from(&config.report);
    if let Some(layout) = args.layout {
        options.layout = layout;
    }
    let exporter = ReportExporter::new(options);
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(exporter.default_file_name()));

    let outcome = backlog.export(&exporter, &path)?;
    println!(
        "Report written: {} ({} initiatives, {} page(s), {} layout)",
        outcome.path.display(),
        outcome.initiatives,
        outcome.pages,
        outcome.layout
    );
    Ok(())
}
