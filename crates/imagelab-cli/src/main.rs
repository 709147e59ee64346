//! imagelab-cli: offline companion to the imagelab browser client.
//!
//! Works on the same core types as the browser client without a running
//! backend. Useful for:
//!
//! - Printing the preset kernels a convolution submission would use
//! - Checking how many pyramid levels an image can support
//! - Extracting result images from a saved backend response
//! - Summarizing the histograms, filter sequence, and intensity mapping
//!   in a saved response
//!
//! # Usage
//!
//! ```text
//! cargo run --bin imagelab-cli -- [OPTIONS] <COMMAND>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use imagelab_core::histogram::{BIN_COUNT, bars, mapping_points};
use imagelab_core::presets::BuiltinPresets;
use imagelab_core::pyramid::compute_max_levels;
use imagelab_core::types::read_dimensions;
use imagelab_core::{
    ClientConfig, MaskMatrixBuilder, Operation, OperationOutcome, ParamBook,
    PresetKind, ProcessedArtifact,
};
use tracing_subscriber::EnvFilter;

/// Offline tools for imagelab masks, pyramid budgets, and saved responses.
#[derive(Parser)]
#[command(name = "imagelab-cli", version)]
struct Cli {
    /// Backend base URL, overriding any configuration file.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// JSON configuration file (`{"apiBaseUrl": "..."}`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a preset kernel as JSON rows.
    Mask {
        /// Preset name (identity, shift, gaussian, sharpen).
        #[arg(long, default_value_t = PresetKind::Identity)]
        kind: PresetKind,

        /// Kernel edge length; even values round up, then clamp to 3..=9.
        #[arg(long, default_value_t = 3)]
        size: usize,
    },

    /// Report the pyramid level budget for each image.
    Levels {
        /// Images to measure (PNG, JPEG, BMP, WebP).
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Print the endpoint URL for an operation.
    Url {
        /// Operation slug (the last segment of its endpoint, e.g. `median-filter`).
        #[arg(value_parser = parse_operation)]
        operation: Operation,
    },

    /// Write the images in a saved backend response to disk.
    Extract {
        /// Operation slug the response belongs to.
        #[arg(long, value_parser = parse_operation)]
        operation: Operation,

        /// Saved JSON response body.
        #[arg(long)]
        response: PathBuf,

        /// Name of the uploaded file the response was produced from.
        #[arg(long, default_value = "image.png")]
        source: String,

        /// Download suffix; defaults to the operation's suffix at default parameters.
        #[arg(long)]
        suffix: Option<String>,

        /// Directory to write into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Summarize the histograms, applied filters, and mapping in a saved
    /// backend response.
    Histogram {
        /// Operation slug the response belongs to.
        #[arg(long, value_parser = parse_operation)]
        operation: Operation,

        /// Saved JSON response body.
        response: PathBuf,
    },
}

/// Look up an operation by the last segment of its endpoint path.
fn parse_operation(slug: &str) -> Result<Operation, String> {
    Operation::ALL
        .into_iter()
        .find(|op| op.endpoint().rsplit('/').next() == Some(slug))
        .ok_or_else(|| {
            let known: Vec<&str> = Operation::ALL
                .iter()
                .filter_map(|op| op.endpoint().rsplit('/').next())
                .collect();
            format!("unknown operation {slug:?} (expected one of: {})", known.join(", "))
        })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    if let Some(url) = &cli.api_url {
        return Ok(ClientConfig::with_base_url(url));
    }
    let Some(path) = &cli.config else {
        return Ok(ClientConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ClientConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn read_outcome(operation: Operation, path: &Path) -> anyhow::Result<OperationOutcome> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("reading response {}", path.display()))?;
    OperationOutcome::decode(operation, &body)
        .with_context(|| format!("decoding {} response {}", operation, path.display()))
}

fn print_mask(kind: PresetKind, size: usize) -> anyhow::Result<()> {
    let mut builder = MaskMatrixBuilder::new();
    let size = builder.set_kernel_size(size);
    if !builder.select_preset_with(kind, &BuiltinPresets) {
        bail!("preset {kind} is unavailable at size {size}");
    }
    let rows = builder.to_submission_matrix();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn print_levels(images: &[PathBuf]) -> anyhow::Result<()> {
    for path in images {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading image {}", path.display()))?;
        let dims = read_dimensions(&bytes)
            .with_context(|| format!("measuring image {}", path.display()))?;
        println!(
            "{}: {}x{}, max levels {}",
            path.display(),
            dims.width,
            dims.height,
            compute_max_levels(dims.width, dims.height),
        );
    }
    Ok(())
}

/// Write the primary image plus any secondary and pyramid images.
///
/// Secondary images append their label to the suffix; pyramid levels
/// append the row label and level index.
fn extract(
    outcome: &OperationOutcome,
    source: &str,
    suffix: &str,
    out_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut targets = vec![(outcome.primary_image().to_owned(), suffix.to_owned())];
    for (label, uri) in outcome.secondary_images() {
        targets.push((uri.to_owned(), format!("{suffix}_{}", slug(label))));
    }
    for gallery in outcome.galleries() {
        for (level, uri) in gallery.images.iter().enumerate() {
            targets.push((uri.clone(), format!("{suffix}_{}_{level}", slug(gallery.label))));
        }
    }

    let mut written = Vec::with_capacity(targets.len());
    for (uri, suffix) in targets {
        let download = ProcessedArtifact::new(uri, source)
            .prepare(&suffix)
            .with_context(|| format!("decoding image for {suffix}"))?;
        let path = out_dir.join(&download.file_name);
        std::fs::write(&path, &download.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = download.bytes.len(), "wrote image");
        written.push(path);
    }
    Ok(written)
}

fn slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

fn histogram_report(outcome: &OperationOutcome) -> String {
    let mut report = String::new();
    let filters = outcome.applied_filters();
    if !filters.is_empty() {
        let _ = writeln!(report, "applied filters: {}", filters.join(", "));
    }
    if let Some(mapping) = outcome.mapping() {
        let _ = writeln!(
            report,
            "mapping: {} of {BIN_COUNT} intensities mapped",
            mapping_points(mapping).len()
        );
    }
    let histograms = outcome.histograms();
    if histograms.is_empty() {
        report.push_str("no histograms in this response\n");
        return report;
    }
    for entry in histograms {
        let _ = writeln!(report, "{}:", entry.label);
        for (name, series) in [
            ("histogram", &entry.series.histogram),
            ("cumulative", &entry.series.cumulative),
        ] {
            match bars(series) {
                Some(bars) => {
                    let peak = bars
                        .iter()
                        .copied()
                        .max_by(|a, b| a.value.total_cmp(&b.value));
                    if let Some(peak) = peak {
                        let _ = writeln!(
                            report,
                            "  {name}: {} bins, peak at intensity {} ({})",
                            bars.len(),
                            peak.intensity,
                            peak.rounded_count(),
                        );
                    }
                }
                None => {
                    let _ = writeln!(report, "  {name}: no data");
                }
            }
        }
    }
    report
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Mask { kind, size } => print_mask(*kind, *size),
        Command::Levels { images } => print_levels(images),
        Command::Url { operation } => {
            let config = load_config(cli)?;
            println!("{}", config.operation_url(*operation));
            Ok(())
        }
        Command::Extract {
            operation,
            response,
            source,
            suffix,
            out_dir,
        } => {
            let outcome = read_outcome(*operation, response)?;
            let suffix = suffix
                .clone()
                .unwrap_or_else(|| ParamBook::default().download_suffix(*operation));
            for path in extract(&outcome, source, &suffix, out_dir)? {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Histogram {
            operation,
            response,
        } => {
            let outcome = read_outcome(*operation, response)?;
            print!("{}", histogram_report(&outcome));
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn operation_slugs_resolve() {
        assert_eq!(parse_operation("median-filter").unwrap(), Operation::Median);
        assert_eq!(parse_operation("blend").unwrap(), Operation::Blend);
        assert_eq!(parse_operation("2pointer").unwrap(), Operation::HistogramMatch);
        assert_eq!(parse_operation("apply-filter").unwrap(), Operation::MinMaxFilter);
        assert!(parse_operation("sharpen").unwrap_err().contains("add-noise"));
    }

    #[test]
    fn every_operation_has_a_slug() {
        for op in Operation::ALL {
            let slug = op.endpoint().rsplit('/').next().unwrap();
            assert_eq!(parse_operation(slug).unwrap(), op);
        }
    }

    #[test]
    fn labels_become_file_friendly() {
        assert_eq!(slug("Gaussian Pyramid"), "gaussian_pyramid");
    }

    #[test]
    fn mask_size_is_normalized() {
        assert_eq!(imagelab_core::KernelSize::new(4).get(), 5);
    }
}
