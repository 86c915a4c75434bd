//! Binary entrypoint for the `portal` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    portal::telemetry::init();
    // Recording and replay are handled in commands::dispatch via
    // PORTAL_RECORD=<dir> and PORTAL_REPLAY=<path>.
    match portal::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
