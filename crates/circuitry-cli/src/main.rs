use std::process;

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use circuitry::CircuitryError;
use circuitry_cli::{Args, error_adapter::to_reportables};

fn main() {
    // Panics are rendered like diagnostics
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(args.log_level.into());
    debug!(args:?; "Parsed arguments");

    if let Err(err) = circuitry_cli::run(&args) {
        report(&err);
        process::exit(1);
    }

    info!("Done");
}

/// Installs the logger. `RUST_LOG` directives are applied on top of `level`.
fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    info!(level:?; "Starting Circuitry");
}

/// Logs each diagnostic of `err` as a rendered miette report.
fn report(err: &CircuitryError) {
    let handler = miette::GraphicalReportHandler::new();

    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        if handler.render_report(&mut rendered, &reportable).is_err() {
            rendered = reportable.to_string();
        }
        error!("{rendered}");
    }
}
