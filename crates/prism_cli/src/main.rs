//! Prism CLI
//!
//! Parse path mini-language data, compute drawing bounds and run hit tests
//! from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prism_core::{Brush, Color, Matrix, Pen, Point, Rect};
use prism_geometry::{Geometry, PathGeometry, PathSegmentKind};
use prism_render::{BoundsDrawingContextWalker, DrawingContext, RenderData, RenderDataDrawingContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::PrismConfig;

#[derive(Parser)]
#[command(name = "prism")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Path geometry bounds and hit testing", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./prism.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse path data and print its figures
    Parse {
        /// Path mini-language data, e.g. "M 0,0 L 10,0 10,10 Z"
        data: String,
    },

    /// Print the world-space bounds of a filled and optionally stroked path
    Bounds {
        /// Path mini-language data
        data: String,

        /// Stroke thickness
        #[arg(short, long)]
        stroke: Option<f64>,

        /// Transform as m11,m12,m21,m22,offset_x,offset_y
        #[arg(short, long, value_parser = parse_matrix)]
        transform: Option<Matrix>,

        /// Skip the fill
        #[arg(long)]
        no_fill: bool,
    },

    /// Hit test a path with a point or a query path
    HitTest {
        /// Path mini-language data of the drawn shape
        data: String,

        /// Point as x,y
        #[arg(short, long, value_parser = parse_point, required_unless_present = "query", conflicts_with = "query")]
        point: Option<Point>,

        /// Query path data
        #[arg(short, long)]
        query: Option<String>,

        /// Stroke thickness
        #[arg(short, long)]
        stroke: Option<f64>,

        /// Skip the fill
        #[arg(long)]
        no_fill: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PrismConfig::load(path)?,
        None => PrismConfig::load_from_dir(&PathBuf::from("."))?,
    };

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&config.logging.filter)
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Parse { data } => cmd_parse(&data),

        Commands::Bounds {
            data,
            stroke,
            transform,
            no_fill,
        } => cmd_bounds(&config, &data, stroke, transform, no_fill),

        Commands::HitTest {
            data,
            point,
            query,
            stroke,
            no_fill,
        } => cmd_hit_test(&config, &data, point, query.as_deref(), stroke, no_fill),
    }
}

fn cmd_parse(data: &str) -> Result<()> {
    let path = parse_path(data)?;

    info!("Parsed {} figure(s)", path.figures.len());
    println!("fill rule: {:?}", path.fill_rule);

    for (index, figure) in path.figures.iter().enumerate() {
        println!(
            "figure {}: start ({}, {}){}{}",
            index,
            figure.start_point.x,
            figure.start_point.y,
            if figure.is_closed { ", closed" } else { "" },
            if figure.is_filled { "" } else { ", unfilled" },
        );

        for segment in &figure.segments {
            println!("  {}", describe_segment(&segment.kind));
        }
    }

    Ok(())
}

fn cmd_bounds(
    config: &PrismConfig,
    data: &str,
    stroke: Option<f64>,
    transform: Option<Matrix>,
    no_fill: bool,
) -> Result<()> {
    let drawing = record_path(data, stroke, transform.as_ref(), no_fill)?;

    let mut walker = BoundsDrawingContextWalker::with_tolerance(config.tolerance());
    let bounds = drawing.get_content_bounds(&mut walker);

    println!("{}", format_rect(&bounds));
    Ok(())
}

fn cmd_hit_test(
    config: &PrismConfig,
    data: &str,
    point: Option<Point>,
    query: Option<&str>,
    stroke: Option<f64>,
    no_fill: bool,
) -> Result<()> {
    let drawing = record_path(data, stroke, None, no_fill)?;

    if let Some(point) = point {
        let hit = drawing.hit_test_point(point);
        println!("{}", if hit { "hit" } else { "miss" });
        return Ok(());
    }

    let query = query.context("either --point or --query is required")?;
    let query = Geometry::from(parse_path(query)?);

    let detail = drawing.hit_test_geometry_with_tolerance(&query, config.tolerance());
    println!("{:?}", detail);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn parse_path(data: &str) -> Result<PathGeometry> {
    PathGeometry::parse(data).with_context(|| format!("Failed to parse path data {:?}", data))
}

/// Record one path as a drawing, filled black unless `no_fill`
fn record_path(
    data: &str,
    stroke: Option<f64>,
    transform: Option<&Matrix>,
    no_fill: bool,
) -> Result<RenderData> {
    let geometry = Arc::new(Geometry::from(parse_path(data)?));
    let brush = (!no_fill).then_some(Brush::BLACK);
    let pen = stroke.map(|thickness| Pen::new(Color::BLACK, thickness));

    if brush.is_none() && pen.is_none() {
        anyhow::bail!("Nothing to draw: --no-fill given without --stroke");
    }

    let mut ctx = RenderDataDrawingContext::new();
    if transform.is_some() {
        ctx.push_transform(transform);
    }
    ctx.draw_geometry(brush.as_ref(), pen.as_ref(), Some(&geometry));

    let drawing = ctx.close();
    debug!(
        instructions = drawing.instruction_count(),
        bytes = drawing.byte_len(),
        "recorded drawing"
    );
    Ok(drawing)
}

fn describe_segment(kind: &PathSegmentKind) -> String {
    match kind {
        PathSegmentKind::Line { to } => format!("line to ({}, {})", to.x, to.y),
        PathSegmentKind::QuadraticBezier { ctrl, to } => format!(
            "quadratic ({}, {}) to ({}, {})",
            ctrl.x, ctrl.y, to.x, to.y
        ),
        PathSegmentKind::Bezier { ctrl1, ctrl2, to } => format!(
            "cubic ({}, {}) ({}, {}) to ({}, {})",
            ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
        ),
        PathSegmentKind::Arc {
            to,
            size,
            rotation_angle,
            is_large_arc,
            sweep_direction,
        } => format!(
            "arc {}x{} rotated {} large={} {:?} to ({}, {})",
            size.width, size.height, rotation_angle, is_large_arc, sweep_direction, to.x, to.y
        ),
    }
}

fn format_rect(rect: &Rect) -> String {
    if rect.is_empty() {
        "empty".to_string()
    } else {
        format!("{} {} {} {}", rect.x, rect.y, rect.width, rect.height)
    }
}

fn parse_numbers<const N: usize>(value: &str) -> Result<[f64; N], String> {
    let numbers = value
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("{:?}: {}", part, e)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    numbers
        .try_into()
        .map_err(|numbers: Vec<f64>| format!("expected {} numbers, got {}", N, numbers.len()))
}

fn parse_point(value: &str) -> Result<Point, String> {
    let [x, y] = parse_numbers::<2>(value)?;
    Ok(Point::new(x, y))
}

fn parse_matrix(value: &str) -> Result<Matrix, String> {
    let [m11, m12, m21, m22, offset_x, offset_y] = parse_numbers::<6>(value)?;
    Ok(Matrix::new(m11, m12, m21, m22, offset_x, offset_y))
}
