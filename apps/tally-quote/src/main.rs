//! # Tally Quote Entry Point

use std::process::ExitCode;

use clap::Parser;
use tally_quote::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match tally_quote::run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Front ends parse the {code, message} object from stderr
            match serde_json::to_string(&err) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}
