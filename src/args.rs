//! Command line arguments for the native demo.

use clap::Parser;

use crate::lighting::{LightingMode, BLINK_INTERVAL};
use crate::DemoConfig;

/// Log verbosity selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliLogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for log::LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Off => log::LevelFilter::Off,
            CliLogLevel::Error => log::LevelFilter::Error,
            CliLogLevel::Warn => log::LevelFilter::Warn,
            CliLogLevel::Info => log::LevelFilter::Info,
            CliLogLevel::Debug => log::LevelFilter::Debug,
            CliLogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Lighting Modes demo arguments.
#[derive(Parser, Debug)]
#[command(
    name = "lighting_demo",
    about = "Lit primitive scene with Thriller and Dreamy lighting presets",
    long_about = "Renders a sphere, cube, torus and floor lit by ambient, point, \
        directional, hemisphere and area lights. Use the panel to tune each light \
        or switch presets.\n\n\
        CONTROLS:\n  \
        Left drag   - Orbit\n  \
        Right drag  - Pan\n  \
        Scroll      - Zoom\n\n\
        EXAMPLES:\n  \
        # Start in thriller mode with a reproducible flicker\n  \
        ./lighting_demo --thriller --seed 7\n\n  \
        # Smoke test: render 120 frames then exit\n  \
        ./lighting_demo --max-frames 120",
    version
)]
pub struct DemoArgs {
    /// Initial window width in pixels.
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height in pixels.
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Disable vertical sync (may cause tearing).
    #[arg(long)]
    pub no_vsync: bool,

    /// Exit after rendering N frames (useful for testing).
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Log level, used when RUST_LOG is not set.
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info)]
    pub log_level: CliLogLevel,

    /// Start in thriller mode instead of dreamy mode.
    #[arg(long)]
    pub thriller: bool,

    /// Seed for the point-light flicker.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Frames between point-light flickers in thriller mode.
    #[arg(
        long,
        default_value_t = BLINK_INTERVAL,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub blink_interval: u64,
}

impl From<DemoArgs> for DemoConfig {
    fn from(args: DemoArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            vsync: !args.no_vsync,
            max_frames: args.max_frames,
            start_mode: if args.thriller {
                LightingMode::Thriller
            } else {
                LightingMode::Calm
            },
            seed: args.seed,
            blink_interval: args.blink_interval,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> DemoArgs {
        DemoArgs::try_parse_from(std::iter::once("lighting_demo").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_match_config_defaults() {
        let config: DemoConfig = parse(&[]).into();
        let defaults = DemoConfig::default();
        assert_eq!(config.width, defaults.width);
        assert_eq!(config.height, defaults.height);
        assert_eq!(config.vsync, defaults.vsync);
        assert_eq!(config.blink_interval, defaults.blink_interval);
        assert_eq!(config.start_mode, LightingMode::Calm);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&[
            "--width",
            "640",
            "--height",
            "480",
            "--no-vsync",
            "--max-frames",
            "10",
            "--thriller",
            "--seed",
            "3",
            "--log-level",
            "debug",
        ]);
        assert_eq!(log::LevelFilter::from(args.log_level), log::LevelFilter::Debug);

        let config: DemoConfig = args.into();
        assert_eq!((config.width, config.height), (640, 480));
        assert!(!config.vsync);
        assert_eq!(config.max_frames, Some(10));
        assert_eq!(config.start_mode, LightingMode::Thriller);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn zero_blink_interval_is_rejected() {
        let result =
            DemoArgs::try_parse_from(["lighting_demo", "--blink-interval", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        DemoArgs::command().debug_assert();
    }
}
