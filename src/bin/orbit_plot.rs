use std::path::{Path, PathBuf};

use clap::Parser;
use plotters::prelude::*;

use rust_orrery::config::AppConfig;
use rust_orrery::logging::init_logging;
use rust_orrery::model::{MotionUpdater, Registry, SimulationClock};

/// Draws a top-down picture of every orbit, with each body where it sits at the
/// given moment.
#[derive(Debug, Parser)]
#[command(name = "orbit_plot")]
struct Args {
    /// RON file describing the bodies. Defaults to the built-in solar system.
    #[arg(long)]
    bodies: Option<PathBuf>,

    /// Simulated time to plot, in Unix milliseconds. Defaults to now.
    #[arg(long)]
    at_ms: Option<f64>,

    /// Days of orbit per second, for bodies with a period.
    #[arg(long, default_value_t = 1.0)]
    days_per_second: f64,

    /// Where to write the PNG.
    #[arg(long, default_value = "plots/orbits.png")]
    output: PathBuf,

    /// Image width and height, in pixels.
    #[arg(long, default_value_t = 800)]
    size: u32,
}

pub fn main() {
    let args = Args::parse();
    init_logging("");

    let config = AppConfig {
        bodies: args.bodies.clone(),
        days_per_second: args.days_per_second,
        ..AppConfig::default()
    };
    let registry = match config.load_registry() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let at_ms = args
        .at_ms
        .unwrap_or_else(|| SimulationClock::starting_now(1).now_ms());

    if let Err(e) = draw_plot(&args.output, args.size, &registry, at_ms, config.days_per_ms()) {
        tracing::error!("couldn't draw {}: {}", args.output.display(), e);
        std::process::exit(1);
    }
    tracing::info!(path = %args.output.display(), at_ms, "plot written");
}

fn draw_plot(
    path: &Path,
    size: u32,
    registry: &Registry,
    at_ms: f64,
    days_per_ms: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let extent = registry.outermost_distance() * 1.1;
    let root = BitMapBackend::new(path, (size, size)).into_drawing_area();
    root.fill(&BLACK)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    let states = MotionUpdater::initial_states(registry, at_ms, days_per_ms);
    for (body, state) in registry.bodies().zip(states.iter()) {
        let color = RGBColor(
            (body.color.x * 255.0) as u8,
            (body.color.y * 255.0) as u8,
            (body.color.z * 255.0) as u8,
        );

        if let Some(orbit) = &body.orbit {
            let n_points = 256;
            chart.draw_series(LineSeries::new(
                (0..=n_points)
                    .map(|i| i as f64 / n_points as f64 * std::f64::consts::TAU)
                    .map(|theta| (orbit.distance * theta.cos(), orbit.distance * theta.sin())),
                &color.mix(0.6),
            ))?;
        }

        let p = state.position;
        chart.draw_series(std::iter::once(Circle::new(
            (p.x, p.y),
            body.display_size.max(1.0) as i32 + 2,
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            body.name.clone(),
            (p.x, p.y),
            ("sans-serif", 14).into_font().color(&WHITE),
        )))?;
    }

    root.present()?;
    Ok(())
}
