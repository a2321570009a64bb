//! Quill CLI
//!
//! Build glyph atlases from TrueType fonts, inspect them, measure text and
//! render it offscreen.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use quill_gpu::{create_headless_device, HeadlessTarget, TextRenderer, TextRendererConfig};
use quill_text::{AtlasConfig, Color, Font};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod metrics;

use config::QuillConfig;
use metrics::AtlasMetrics;

#[derive(Parser)]
#[command(name = "quill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Glyph atlas builder and text renderer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Atlas settings shared by every command
#[derive(Args, Debug)]
struct AtlasArgs {
    /// TrueType font file
    font: PathBuf,

    /// Font size in points
    #[arg(short, long)]
    size: Option<f32>,

    /// Config file (defaults to ./quill.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an atlas and save it as a PNG
    Atlas {
        #[command(flatten)]
        atlas: AtlasArgs,

        /// First code point to rasterize
        #[arg(long)]
        low: Option<char>,

        /// Last code point to rasterize
        #[arg(long)]
        high: Option<char>,

        /// Atlas width and height in pixels
        #[arg(long)]
        atlas_size: Option<u32>,

        /// Output PNG
        #[arg(short, long)]
        out: PathBuf,

        /// Also write the glyph table as JSON
        #[arg(short, long)]
        metrics: Option<PathBuf>,
    },

    /// Print the width of a string in pixels
    Measure {
        #[command(flatten)]
        atlas: AtlasArgs,

        /// Multiplier applied to glyph sizes and advances
        #[arg(long, default_value = "1.0")]
        scale: f32,

        /// Text to measure
        text: String,
    },

    /// Render a string offscreen and save it as a PNG
    Render {
        #[command(flatten)]
        atlas: AtlasArgs,

        /// Multiplier applied to glyph sizes and advances
        #[arg(long, default_value = "1.0")]
        scale: f32,

        /// Text color as RRGGBBAA hex
        #[arg(long, default_value = "FFFFFFFF", value_parser = parse_color)]
        color: Color,

        /// Image width in pixels (defaults to the text width plus padding)
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels (defaults to the line height plus padding)
        #[arg(long)]
        height: Option<u32>,

        /// Output PNG
        #[arg(short, long)]
        out: PathBuf,

        /// Text to render
        text: String,
    },
}

/// Padding around rendered text, in pixels
const RENDER_PADDING: f32 = 8.0;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Atlas {
            atlas,
            low,
            high,
            atlas_size,
            out,
            metrics,
        } => {
            let mut config = atlas_config(&atlas)?;
            if let Some(low) = low {
                config.low = low;
            }
            if let Some(high) = high {
                config.high = high;
            }
            if let Some(atlas_size) = atlas_size {
                config.atlas_size = atlas_size;
            }
            cmd_atlas(&atlas.font, &config, &out, metrics.as_deref())
        }

        Commands::Measure { atlas, scale, text } => {
            let config = atlas_config(&atlas)?;
            cmd_measure(&atlas.font, &config, scale, &text)
        }

        Commands::Render {
            atlas,
            scale,
            color,
            width,
            height,
            out,
            text,
        } => {
            let config = atlas_config(&atlas)?;
            let options = RenderOptions {
                scale,
                color,
                width,
                height,
            };
            cmd_render(&atlas.font, &config, &options, &out, &text)
        }
    }
}

/// File settings with command-line overrides applied
fn atlas_config(args: &AtlasArgs) -> Result<AtlasConfig> {
    let mut config = QuillConfig::load(args.config.as_deref())?.atlas;
    if let Some(size) = args.size {
        config.point_size = size;
    }
    Ok(config)
}

fn load_font(path: &Path, config: &AtlasConfig) -> Result<Font> {
    let font = Font::load(path, config)
        .with_context(|| format!("Failed to build atlas for {}", path.display()))?;

    info!(
        "Built {} glyphs from {} at {}pt",
        font.glyphs().len(),
        path.display(),
        font.point_size()
    );

    Ok(font)
}

fn cmd_atlas(font_path: &Path, config: &AtlasConfig, out: &Path, metrics: Option<&Path>) -> Result<()> {
    let font = load_font(font_path, config)?;

    font.atlas()
        .save_png(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!("Wrote atlas to {}", out.display());

    if let Some(metrics_path) = metrics {
        let json = serde_json::to_string_pretty(&AtlasMetrics::from_font(&font))
            .context("Failed to serialize glyph metrics")?;
        fs::write(metrics_path, json)
            .with_context(|| format!("Failed to write {}", metrics_path.display()))?;
        info!("Wrote glyph metrics to {}", metrics_path.display());
    }

    Ok(())
}

fn cmd_measure(font_path: &Path, config: &AtlasConfig, scale: f32, text: &str) -> Result<()> {
    let font = load_font(font_path, config)?;
    println!("{}", font.measure(scale, text));
    Ok(())
}

struct RenderOptions {
    scale: f32,
    color: Color,
    width: Option<u32>,
    height: Option<u32>,
}

fn cmd_render(
    font_path: &Path,
    config: &AtlasConfig,
    options: &RenderOptions,
    out: &Path,
    text: &str,
) -> Result<()> {
    let mut font = load_font(font_path, config)?;
    let Color { r, g, b, a } = options.color;
    font.set_color(r, g, b, a);

    let line_height = font.line_height() as f32 * options.scale;
    // Tallest extent above the baseline
    let ascent = font
        .glyphs()
        .iter()
        .map(|g| g.height as i32 - g.bearing_v)
        .max()
        .unwrap_or(0)
        .max(0) as f32
        * options.scale;
    let width = options.width.unwrap_or_else(|| {
        (font.measure(options.scale, text) + RENDER_PADDING * 2.0).ceil() as u32
    });
    let height = options
        .height
        .unwrap_or_else(|| (line_height + RENDER_PADDING * 2.0).ceil() as u32);

    let (device, queue) = create_headless_device().context("Failed to create GPU device")?;

    let mut renderer = TextRenderer::new(device.clone(), queue.clone(), TextRendererConfig::default());
    renderer.update_resolution(width, height);

    let target = HeadlessTarget::new(&device, width, height);
    target.clear(&device, &queue, Color::TRANSPARENT);

    let gpu_font = renderer.upload_font(&font);
    let drawn = renderer.draw(
        target.view(),
        &gpu_font,
        &font,
        RENDER_PADDING,
        RENDER_PADDING + ascent,
        options.scale,
        text,
    );
    info!("Drew {} glyphs into {}x{}", drawn, width, height);

    let image = target
        .read_rgba(&device, &queue)
        .context("Failed to read back render target")?;
    image
        .save(out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!("Wrote {}", out.display());

    Ok(())
}

fn parse_color(value: &str) -> Result<Color, String> {
    let hex = value.trim_start_matches('#');
    if hex.len() != 8 {
        return Err(format!("expected RRGGBBAA, got '{}'", value));
    }
    u32::from_str_radix(hex, 16)
        .map(Color::from_hex_rgba)
        .map_err(|e| format!("invalid color '{}': {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("FF0000FF").unwrap(), Color::RED);
        assert_eq!(parse_color("#00000000").unwrap(), Color::TRANSPARENT);
        assert!(parse_color("FFF").is_err());
        assert!(parse_color("GG0000FF").is_err());
    }

    #[test]
    fn test_atlas_overrides() {
        let cli = Cli::try_parse_from([
            "quill", "atlas", "font.ttf", "--size", "24", "--low", "A", "--high", "Z", "--out",
            "atlas.png",
        ])
        .unwrap();

        match cli.command {
            Commands::Atlas {
                atlas, low, high, out, metrics, ..
            } => {
                assert_eq!(atlas.font, PathBuf::from("font.ttf"));
                assert_eq!(atlas.size, Some(24.0));
                assert_eq!(low, Some('A'));
                assert_eq!(high, Some('Z'));
                assert_eq!(out, PathBuf::from("atlas.png"));
                assert!(metrics.is_none());
            }
            _ => panic!("expected atlas command"),
        }
    }

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["quill", "render", "font.ttf", "-o", "out.png", "Hello"])
            .unwrap();

        match cli.command {
            Commands::Render {
                scale, color, text, width, ..
            } => {
                assert_eq!(scale, 1.0);
                assert_eq!(color, Color::WHITE);
                assert_eq!(text, "Hello");
                assert!(width.is_none());
            }
            _ => panic!("expected render command"),
        }
    }

    #[test]
    fn test_size_flag_overrides_config() {
        let args = AtlasArgs {
            font: PathBuf::from("font.ttf"),
            size: Some(12.0),
            config: None,
        };
        // No quill.toml in the test working directory
        let config = atlas_config(&args).unwrap();
        assert_eq!(config.point_size, 12.0);
    }
}
