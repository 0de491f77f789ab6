use std::process::ExitCode;

use btry::cli::{self, ParseOutcome};
use log::error;
use simplelog::{Config, TermLogger};

fn main() -> ExitCode {
    TermLogger::init(
        log::LevelFilter::Info,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .unwrap();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let colors = match cli::parse(&args) {
        ParseOutcome::Continue(colors) => colors,
        // help, the palette listing and argument errors all exit clean
        ParseOutcome::ExitEarly => return ExitCode::SUCCESS,
    };

    if let Err(e) = btry::run(colors) {
        error!("Application stopped unexpectedly: {e:?}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
