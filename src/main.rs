use std::process;

use clap::Parser;

use grokrs::cli::Args;

fn main() {
    let args = Args::parse();
    match grokrs::run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(3);
        }
    }
}
