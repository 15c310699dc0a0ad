//! `render-text`: loads a TrueType font, rasterizes a string of text into
//! an RGB canvas, and writes the result as a PNG.
//!
//! Grounded on spec section 6's "driver surface" (font path, text, pixel
//! height, output path); the `clap`/`anyhow`/`env_logger` wiring follows
//! the CLI binaries in the broader example pack (several font/PDF tools
//! there wrap a library crate with exactly this shape).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use font_raster::layout;
use font_raster::raster::canvas::{Canvas, Rgb8};
use font_raster::raster::fill::FillRule;
use font_raster::Font;

#[derive(Parser, Debug)]
#[command(name = "render-text", about = "Rasterize text with a TrueType font into a PNG")]
struct Cli {
    /// Path to a .ttf font file.
    #[arg(long)]
    font: PathBuf,

    /// Text to render.
    #[arg(long)]
    text: String,

    /// Target pixel height, ascent to descent.
    #[arg(long, default_value_t = 64)]
    height: u32,

    /// Output PNG path.
    #[arg(long, default_value = "out.png")]
    output: PathBuf,
}

fn run(cli: Cli) -> Result<()> {
    let mut font = Font::open(&cli.font).with_context(|| format!("opening font {}", cli.font.display()))?;

    let metrics = font.font_metrics();
    let units_per_em = (metrics.ascent - metrics.descent) as f32;
    let scale = cli.height as f32 / units_per_em;
    let canvas_width = (cli.text.chars().count() as f32 * units_per_em * scale).max(cli.height as f32) as u32 + 32;
    let canvas_height = cli.height + 32;

    let mut canvas = Canvas::new(canvas_width, canvas_height, Rgb8::new(255, 255, 255));
    let baseline = metrics.ascent as f32 * scale + 16.0;

    let summary = layout::render_text(
        &mut font,
        &cli.text,
        cli.height as f32,
        16.0,
        baseline,
        FillRule::NonZero,
        Rgb8::new(0, 0, 0),
        &mut canvas,
    )
    .context("rendering text")?;

    log::info!("rendered {} glyphs, advanced {:.1}px", summary.glyph_count, summary.total_advance);

    let mut raw = Vec::with_capacity((canvas.width() * canvas.height() * 3) as usize);
    for pixel in canvas.pixels() {
        raw.push(pixel.r);
        raw.push(pixel.g);
        raw.push(pixel.b);
    }
    let image = image::RgbImage::from_raw(canvas.width(), canvas.height(), raw)
        .context("assembling output image buffer")?;
    image.save(&cli.output).with_context(|| format!("writing PNG to {}", cli.output.display()))?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("render-text: {err:#}");
            ExitCode::FAILURE
        }
    }
}
