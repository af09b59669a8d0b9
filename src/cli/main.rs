//! Image enhancement CLI tool
//!
//! Command-line interface over the unified processor: enhance opaque images,
//! enhance background-removed cutouts, or composite cutouts onto a solid
//! color. Background removal itself needs an external model runtime and is
//! not wired into this binary.

use crate::{
    config::{OutputFormat, ProcessorConfig},
    processor::EnhancementProcessor,
    tracing_config::init_cli_tracing,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// Image enhancement and compositing CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "pixelift")]
pub struct Cli {
    /// Input image file (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Output file. Use "-" for stdout; defaults to `<input>-pixelift.png`.
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Processing mode
    #[arg(short, long, value_enum, default_value_t = CliMode::Enhance)]
    pub mode: CliMode,

    /// Background color for composite mode (RRGGBB hex, optional leading '#')
    #[arg(short, long, value_name = "COLOR")]
    pub color: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = CliOutputFormat::Png)]
    pub format: CliOutputFormat,

    /// JPEG quality (0-100)
    #[arg(long, default_value_t = 90)]
    pub jpeg_quality: u8,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the per-stage timing breakdown after processing
    #[arg(long)]
    pub show_timings: bool,
}

/// Processing mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    /// Enhance an opaque image (decoded as RGB)
    Enhance,
    /// Enhance a background-removed cutout (decoded as RGBA)
    EnhanceCutout,
    /// Composite a cutout over a solid background color
    Composite,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliOutputFormat {
    /// PNG with alpha channel
    Png,
    /// JPEG (flattens alpha)
    Jpeg,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Png => Self::Png,
            CliOutputFormat::Jpeg => Self::Jpeg,
        }
    }
}

/// CLI entry point
///
/// # Errors
///
/// Returns an error for unreadable input, processing failures, or
/// unwritable output.
pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_cli_tracing(cli.verbose)?;
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let input_bytes = read_input(&cli.input)?;

    let config = ProcessorConfig::builder()
        .output_format(cli.format.into())
        .jpeg_quality(cli.jpeg_quality)
        .build()?;
    let mut processor = EnhancementProcessor::new(config);

    let mut result = match cli.mode {
        CliMode::Enhance => processor.enhance_image(&input_bytes)?,
        CliMode::EnhanceCutout => processor.enhance_cutout(&input_bytes)?,
        CliMode::Composite => {
            processor.add_color_background(&input_bytes, cli.color.as_deref())?
        },
    };

    let output_bytes = processor.encode(&mut result)?;
    if cli.show_timings {
        eprintln!("{}", result.timings.summary());
    }
    let destination = write_output(cli, &output_bytes)?;
    info!(
        "{} -> {} ({}x{} in, {}x{} out)",
        cli.input,
        destination,
        result.original_dimensions.0,
        result.original_dimensions.1,
        result.dimensions().0,
        result.dimensions().1
    );
    Ok(())
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("failed to read image data from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read(input).with_context(|| format!("failed to read input file '{}'", input))
    }
}

fn write_output(cli: &Cli, bytes: &[u8]) -> Result<String> {
    match cli.output.as_deref() {
        Some("-") => {
            io::stdout()
                .write_all(bytes)
                .context("failed to write image data to stdout")?;
            Ok("<stdout>".to_string())
        },
        Some(path) => {
            std::fs::write(path, bytes)
                .with_context(|| format!("failed to write output file '{}'", path))?;
            Ok(path.to_string())
        },
        None => {
            let path = default_output_path(&cli.input, cli.format);
            std::fs::write(&path, bytes)
                .with_context(|| format!("failed to write output file '{}'", path.display()))?;
            Ok(path.display().to_string())
        },
    }
}

fn default_output_path(input: &str, format: CliOutputFormat) -> PathBuf {
    let extension = match format {
        CliOutputFormat::Png => "png",
        CliOutputFormat::Jpeg => "jpg",
    };
    let input_path = PathBuf::from(input);
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    input_path.with_file_name(format!("{}-pixelift.{}", stem, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_keeps_directory_and_swaps_extension() {
        let path = default_output_path("photos/cat.jpeg", CliOutputFormat::Png);
        assert_eq!(path, PathBuf::from("photos/cat-pixelift.png"));

        let path = default_output_path("cat.png", CliOutputFormat::Jpeg);
        assert_eq!(path, PathBuf::from("cat-pixelift.jpg"));
    }

    #[test]
    fn cli_parses_composite_invocation() {
        let cli = Cli::try_parse_from([
            "pixelift",
            "cutout.png",
            "--mode",
            "composite",
            "--color",
            "#00ff00",
            "-o",
            "out.png",
        ])
        .unwrap();
        assert_eq!(cli.mode, CliMode::Composite);
        assert_eq!(cli.color.as_deref(), Some("#00ff00"));
        assert_eq!(cli.output.as_deref(), Some("out.png"));
    }

    #[test]
    fn cli_defaults_to_enhance_png() {
        let cli = Cli::try_parse_from(["pixelift", "input.jpg"]).unwrap();
        assert_eq!(cli.mode, CliMode::Enhance);
        assert_eq!(cli.format, CliOutputFormat::Png);
        assert_eq!(cli.jpeg_quality, 90);
    }
}
