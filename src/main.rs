//! compdoc - generates configuration reference documentation for components.

use std::process;

use clap::Parser;
use compdoc::{
    cli::{self, Cli, formatting::format_error},
    tracing_config,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    tracing_config::init()?;

    match cli::execute(cli) {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
