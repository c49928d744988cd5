//! Entry point: tile the default input image into the default output pattern

use patterntile::io::configuration::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
use patterntile::io::progress::ConsoleReporter;
use patterntile::{PatternConfig, Termination, create_pattern};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut reporter = ConsoleReporter::new();
    let result = create_pattern(
        DEFAULT_INPUT_PATH,
        DEFAULT_OUTPUT_PATH,
        &PatternConfig::default(),
        &mut reporter,
    );

    if Termination::of(&result).is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
