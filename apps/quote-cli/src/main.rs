//! # fixquote Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging to stderr)
//! 2. Hand the arguments to [`fixquote_cli::run`]
//! 3. Print the report, or the error with its code and exit 1

use std::process::ExitCode;

fn main() -> ExitCode {
    fixquote_cli::init_tracing();

    match fixquote_cli::run(std::env::args().skip(1)) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(?err, "Run failed");
            eprintln!("error[{}]: {}", err.code().as_str(), err);
            ExitCode::FAILURE
        }
    }
}
