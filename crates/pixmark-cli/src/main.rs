//! pixmark - Turn images into rich-text markup
//!
//! A command-line tool that converts an image into `<color>`/`<size>` markup
//! segments small enough to paste into chat boxes and text fields.

mod output;
mod source;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pixmark::{
    encode_with_progress, fit_zoom, EncoderConfig, EncodingResult, HexColor, SegmentRule,
    TransparencyPolicy,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::source::{LoadedImage, TargetSize};

#[derive(Parser)]
#[command(name = "pixmark")]
#[command(version)]
#[command(about = "Turn images into rich-text markup segments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an image and write all segments
    Encode {
        #[command(flatten)]
        encode: EncodeArgs,

        /// Output file, one segment per line (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Precede each segment with a `# row R segment S` header line
        #[arg(short, long)]
        annotate: bool,

        /// Save a PNG of the encoded colours
        #[arg(short, long)]
        preview: Option<PathBuf>,

        /// Preview zoom factor (default: fit into 500 pixels, at most 20)
        #[arg(short, long)]
        zoom: Option<usize>,

        /// Put the resized source image to the left of the preview
        #[arg(long)]
        side_by_side: bool,
    },

    /// Print one page of annotated segments
    Show {
        #[command(flatten)]
        encode: EncodeArgs,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Segments per page
        #[arg(long, default_value = "5")]
        per_page: usize,
    },
}

#[derive(Args)]
struct EncodeArgs {
    /// Input image file (PNG, JPEG, GIF, WebP, BMP, TIFF)
    input: PathBuf,

    /// Target width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Target height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Do not derive a missing side from the source aspect ratio
    #[arg(long)]
    no_keep_aspect: bool,

    /// Treatment of pixels below the alpha threshold
    #[arg(long, value_enum, default_value = "keep")]
    transparency: Transparency,

    /// Background colour for `--transparency custom`
    #[arg(long, default_value = "#888888", value_parser = parse_color)]
    color: HexColor,

    /// Alpha below this counts as transparent (0-255)
    #[arg(long, default_value = "128")]
    alpha_threshold: u8,

    /// Keep partial alpha of pixels at or above the threshold
    #[arg(long)]
    keep_alpha: bool,

    /// Use 4-bit-per-channel `#rgb` colours
    #[arg(long)]
    minimal: bool,

    /// Merge neighbours within this channel-difference sum (0-1020)
    #[arg(long)]
    merge: Option<u16>,

    /// How to split rows into segments
    #[arg(long, value_enum, default_value = "pixels")]
    rule: Rule,

    /// Maximum pixels per segment
    #[arg(long, default_value = "40")]
    pixel_limit: usize,

    /// Maximum characters per segment
    #[arg(long, default_value = "1000")]
    char_limit: usize,

    /// Font size for the `<size>` wrapper (at least 1)
    #[arg(long, default_value = "5")]
    font_size: u32,

    /// Leave out the `<size>` wrapper
    #[arg(long)]
    no_font_size: bool,

    /// Spaces per blank pixel
    #[arg(long, default_value = "1")]
    space_count: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transparency {
    /// Paint with --color
    Custom,
    /// Emit the transparent colour tag
    Keep,
    /// Emit spaces
    Space,
}

#[derive(Clone, Copy, ValueEnum)]
enum Rule {
    /// Limit pixels per segment
    Pixels,
    /// Limit characters per segment
    Chars,
}

fn parse_color(s: &str) -> Result<HexColor, String> {
    s.parse().map_err(|e: pixmark::PixmarkError| e.to_string())
}

impl EncodeArgs {
    fn target(&self) -> TargetSize {
        TargetSize {
            width: self.width,
            height: self.height,
            keep_aspect: !self.no_keep_aspect,
        }
    }

    fn config(&self) -> EncoderConfig {
        EncoderConfig {
            transparency: match self.transparency {
                Transparency::Custom => TransparencyPolicy::CustomColor,
                Transparency::Keep => TransparencyPolicy::KeepTransparent,
                Transparency::Space => TransparencyPolicy::SpaceReplace,
            },
            custom_color: self.color,
            alpha_threshold: self.alpha_threshold,
            keep_above_threshold_alpha: self.keep_alpha,
            minimal_color: self.minimal,
            merge_similar: self.merge.is_some(),
            similarity_threshold: self.merge.unwrap_or(0),
            segment_rule: match self.rule {
                Rule::Pixels => SegmentRule::ByPixelCount,
                Rule::Chars => SegmentRule::ByCharLength,
            },
            pixel_limit: self.pixel_limit,
            char_limit: self.char_limit,
            font_size: (!self.no_font_size).then_some(self.font_size),
            space_count: self.space_count,
        }
    }

    fn run(&self) -> Result<(LoadedImage, EncodingResult), Box<dyn std::error::Error>> {
        let config = self.config().validated()?;
        let loaded = source::load(&self.input, self.target())?;

        eprintln!(
            "Encoding '{}' ({}x{} -> {}x{})",
            self.input.display(),
            loaded.original_size.0,
            loaded.original_size.1,
            loaded.buffer.width(),
            loaded.buffer.height()
        );

        let mut next_step = 0u8;
        let result = encode_with_progress(&loaded.buffer, &config, |percent| {
            if percent >= next_step {
                log::info!("{percent}%");
                next_step = percent - percent % 10 + 10;
            }
        })?;

        Ok((loaded, result))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            encode,
            output: out_path,
            annotate,
            preview,
            zoom,
            side_by_side,
        } => {
            let (loaded, result) = encode.run()?;

            match out_path {
                Some(path) => {
                    let mut out = BufWriter::new(File::create(&path)?);
                    output::write_segments(&mut out, &result.segments, annotate)?;
                    out.flush()?;
                    eprintln!("Written {} segments to '{}'", result.segments.len(), path.display());
                }
                None => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    output::write_segments(&mut out, &result.segments, annotate)?;
                }
            }

            if let Some(path) = preview {
                let zoom = zoom.unwrap_or_else(|| fit_zoom(result.width, result.height));
                let source = side_by_side.then_some(&loaded.resized);
                output::save_preview(&path, &result.preview, zoom, source)?;
                eprintln!("Preview ({}x zoom) -> '{}'", zoom, path.display());
            }

            eprintln!("{}", output::summary(&result));
        }

        Commands::Show {
            encode,
            page,
            per_page,
        } => {
            let (_, result) = encode.run()?;
            let pages = result.page_count(per_page);
            let index = page.clamp(1, pages.max(1)) - 1;

            let stdout = io::stdout();
            let mut out = stdout.lock();
            output::write_segments(&mut out, result.page(index, per_page), true)?;
            writeln!(out, "page {} of {}, {}", index + 1, pages, output::summary(&result))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> EncodeArgs {
        let mut argv = vec!["pixmark", "encode", "in.png"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Encode { encode, .. } => encode,
            Commands::Show { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_font_size_passes_through() {
        assert_eq!(args(&["--font-size", "250"]).config().font_size, Some(250));
        assert_eq!(args(&["--no-font-size"]).config().font_size, None);
    }

    #[test]
    fn test_zero_font_size_is_rejected() {
        let config = args(&["--font-size", "0"]).config();
        assert_eq!(config.font_size, Some(0));
        assert!(matches!(
            config.validated(),
            Err(pixmark::PixmarkError::InvalidConfig(_))
        ));
    }
}
