use clap::Parser;

use pensionpot::api::{Cli, run};

fn main() {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
