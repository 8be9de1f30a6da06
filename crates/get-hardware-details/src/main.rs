/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

//! get-hardware-details converts an inspection payload that was already
//! fetched from the inspection provider into the canonical hardware details
//! record and prints it.

mod logging;
mod output;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use eyre::WrapErr;
use hardware_details::{
    InspectionSource, NormalizationConfig, Normalized, Normalizer, PayloadFormat, RawPayload,
    SavedInspections,
};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "get-hardware-details",
    about = "Convert raw inspection data into canonical hardware details",
    version
)]
struct Cli {
    /// Payload file, `-` for stdin, or a node id when --inspection-dir is given
    #[arg(value_name = "INPUT")]
    input: String,

    /// Directory of saved payloads named `<node>.json` or `<node>.yaml`
    #[arg(long, value_name = "DIR")]
    inspection_dir: Option<PathBuf>,

    /// Normalization config in toml format
    #[arg(short, long, value_name = "FILE", env = "HARDWARE_DETAILS_CONFIG")]
    config: Option<PathBuf>,

    /// Payload encoding. Defaults to the file extension, then json.
    #[arg(long, value_enum)]
    input_format: Option<InputFormat>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output_format: OutputFormat,

    /// Print the diagnostics next to the record
    #[arg(long)]
    show_diagnostics: bool,

    /// Exit with an error if any field could not be extracted
    #[arg(long)]
    strict: bool,

    /// Log filter, overrides RUST_LOG. Logs go to stderr.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum InputFormat {
    Json,
    Yaml,
}

impl From<InputFormat> for PayloadFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Json => PayloadFormat::Json,
            InputFormat::Yaml => PayloadFormat::Yaml,
        }
    }
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref())?;

    let normalized = run(&cli)?;
    println!(
        "{}",
        output::render(&normalized, cli.output_format, cli.show_diagnostics)?
    );

    if cli.strict && !normalized.is_clean() {
        eyre::bail!(
            "{} inspection field(s) could not be extracted",
            normalized.diagnostics.len()
        );
    }
    Ok(())
}

fn run(cli: &Cli) -> eyre::Result<Normalized> {
    let config = match &cli.config {
        Some(path) => NormalizationConfig::load_from(path)
            .wrap_err_with(|| format!("Loading normalization config {}", path.display()))?,
        None => NormalizationConfig::default(),
    };
    let normalizer = Normalizer::new(&config).wrap_err("Invalid normalization config")?;
    let payload = load_payload(cli)?;
    Ok(normalizer.normalize(&payload))
}

fn load_payload(cli: &Cli) -> eyre::Result<RawPayload> {
    if let Some(dir) = &cli.inspection_dir {
        return SavedInspections::new(dir)
            .fetch(&cli.input)
            .wrap_err_with(|| format!("Fetching inspection data for node {}", cli.input));
    }

    let (data, format) = if cli.input == "-" {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .wrap_err("Reading inspection payload from stdin")?;
        (data, cli.input_format.map(PayloadFormat::from).unwrap_or_default())
    } else {
        let path = Path::new(&cli.input);
        let data = std::fs::read(path)
            .wrap_err_with(|| format!("Reading inspection payload {}", path.display()))?;
        let format = cli
            .input_format
            .map(PayloadFormat::from)
            .unwrap_or_else(|| format_from_extension(path));
        (data, format)
    };
    RawPayload::decode(&data, format).wrap_err("Could not convert inspection data")
}

fn format_from_extension(path: &Path) -> PayloadFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            PayloadFormat::Yaml
        }
        _ => PayloadFormat::Json,
    }
}
