use clap::Parser;
use jana_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    if let Err(e) = commands::setup_logging(&args) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match commands::run(&args) {
        Ok(_summary) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
