use bkp_commands::{BkpCommand, Cli};
use bkp_utils::term::print_error;
use clap::Parser;

fn main() {
    let result = Cli::parse().invoke();

    match result.map_err(|e| e.to_string()) {
        Err(e) if !e.is_empty() => {
            if let Err(e) = print_error(&e) {
                eprintln!("{e}");
            }
            std::process::exit(1);
        }
        _ => {}
    }
}
