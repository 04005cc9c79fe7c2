//! Native Lighting Modes demo
//!
//! Controls:
//!   Left drag   - Orbit around the cube
//!   Right drag  - Pan
//!   Scroll      - Zoom
//!   Panel       - Tune lights, switch Thriller / Dreamy mode

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;
    use lighting_modes::args::DemoArgs;
    use lighting_modes::DemoConfig;

    let args = DemoArgs::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    let config = DemoConfig::from(args);
    log::info!(
        "Starting {} ({}x{}, vsync {}, {:?} mode)",
        config.title,
        config.width,
        config.height,
        config.vsync,
        config.start_mode
    );

    if let Err(e) = lighting_modes::app::run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
