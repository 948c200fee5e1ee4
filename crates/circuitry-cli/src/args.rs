//! Command line of the `circuitry` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Render a circuit document to SVG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Circuit document to render (TOML)
    pub input: PathBuf,

    /// Where to write the SVG
    #[arg(short, long, default_value = "out.svg")]
    pub output: PathBuf,

    /// Configuration file. When omitted, `circuitry/config.toml` and then
    /// the user configuration directory are searched.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Measure text as PX pixels per character instead of shaping it with
    /// the system fonts
    #[arg(long, value_name = "PX", value_parser = parse_advance)]
    pub text_advance: Option<f32>,

    /// Log verbosity; `RUST_LOG` refines it per module
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn parse_advance(value: &str) -> Result<f32, String> {
    let advance: f32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !advance.is_finite() || advance <= 0.0 {
        return Err(format!("advance must be a positive number, got {value}"));
    }
    Ok(advance)
}
