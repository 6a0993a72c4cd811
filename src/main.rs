use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;
use tracing::{error, info};

use rust_orrery::config::{AppConfig, CliArgs};
use rust_orrery::gui::Simulation;
use rust_orrery::logging::init_logging;
use rust_orrery::model::{Orrery, SimulationClock};

fn main() {
    let args = CliArgs::parse();
    init_logging(args.log_level.as_deref().unwrap_or(""));

    let config = match AppConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let registry = match config.load_registry() {
        Ok(registry) => registry,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        bodies = registry.len(),
        source = %config
            .bodies
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| String::from("built-in")),
        "registry loaded"
    );

    let clock = SimulationClock::starting_now(config.speed);
    let orrery = Orrery::new(registry, clock, config.policy, config.days_per_ms());

    let mut window = Window::new_with_size("Solar System", config.width, config.height);
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(60));
    window.set_background_color(0.0, 0.0, 0.0);

    let simulation = Simulation::new(orrery, &mut window, &config);
    window.render_loop(simulation);
}
