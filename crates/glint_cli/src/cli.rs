use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "glint")]
#[command(about = "Render an SDL scene with a Whitted ray tracer")]
pub struct Args {
    /// Scene description file
    #[arg(short, long)]
    pub scene: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "raytraced.png")]
    pub output: PathBuf,

    /// Number of render threads [default: 4, or `threads` from the config]
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// JSON render configuration; command line flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Logging level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["glint", "-s", "scene.txt"]);
        assert_eq!(args.scene, PathBuf::from("scene.txt"));
        assert_eq!(args.output, PathBuf::from("raytraced.png"));
        assert!(args.threads.is_none());
        assert!(args.config.is_none());
        assert!(args.seed.is_none());
        assert!(matches!(args.log_level, LogLevel::Info));
    }

    #[test]
    fn test_all_flags() {
        let args = Args::parse_from([
            "glint", "--scene", "a.sdl", "-o", "out.png", "-t", "8", "-c", "render.json",
            "--seed", "9", "--log-level", "debug",
        ]);
        assert_eq!(args.threads, Some(8));
        assert_eq!(args.config, Some(PathBuf::from("render.json")));
        assert_eq!(args.seed, Some(9));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }

    #[test]
    fn test_scene_is_required() {
        assert!(Args::try_parse_from(["glint"]).is_err());
    }
}
