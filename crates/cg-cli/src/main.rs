// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of ChromaGrad — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Command-line front end: reads a stop list, runs the engine, renders the
//! result. Progress goes to stderr through the log layer, the rendered
//! gradient to stdout.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use cg_gradient::{
    make_gradient_with, parse_stops, render, Background, CompiledLoss, GradientOptions,
    Progress, DEFAULT_DIFF_WEIGHT,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackgroundArg {
    Dark,
    Neutral,
    Light,
}

impl From<BackgroundArg> for Background {
    fn from(value: BackgroundArg) -> Self {
        match value {
            BackgroundArg::Dark => Background::Dark,
            BackgroundArg::Neutral => Background::Neutral,
            BackgroundArg::Light => Background::Light,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Ansi,
    Csv,
    Html,
    Json,
}

/// Perceptually smooth gradients between color stops.
///
/// The stop list has one stop per line: `<position> [:] <color>` with the
/// color as `#rgb`, `#rrggbb`, or `rgb(...)`/`rgba(...)`.
#[derive(Debug, Parser)]
#[command(name = "chromagrad", version, about)]
struct Cli {
    /// Stop list file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Number of output colors.
    #[arg(long, default_value_t = 30)]
    steps: usize,

    /// Close the gradient so it loops seamlessly.
    #[arg(long)]
    periodic: bool,

    /// Background the colors will be viewed against.
    #[arg(long, value_enum, default_value = "neutral")]
    background: BackgroundArg,

    /// Output format.
    #[arg(long, value_enum, default_value = "ansi")]
    format: Format,

    /// Seed for the symmetry-breaking jitter, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let text = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("cannot read {}: {err}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("cannot read stdin: {err}"))?;
            buffer
        }
    };
    let stops = parse_stops(&text).map_err(|err| err.to_string())?;

    let loss = CompiledLoss::new(Background::from(cli.background).rgb(), DEFAULT_DIFF_WEIGHT);
    let options = GradientOptions {
        steps: cli.steps,
        periodic: cli.periodic,
        seed: cli.seed,
        ..GradientOptions::default()
    };
    let progress = |progress: Progress| tracing::info!("{progress}");
    let result = make_gradient_with(&loss, &stops, &options, Some(&progress))
        .map_err(|err| err.to_string())?;
    tracing::info!("{}", result.summary);

    let rendered = match cli.format {
        Format::Ansi => render::to_ansi(&result.positions, &result.colors),
        Format::Csv => render::to_csv(&result.positions, &result.colors),
        Format::Html => render::to_html(&result.positions, &result.colors),
        Format::Json => {
            serde_json::to_string_pretty(&result).map_err(|err| err.to_string())? + "\n"
        }
    };
    print!("{rendered}");
    Ok(())
}
