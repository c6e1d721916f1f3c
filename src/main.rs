use clap::Parser;
use unitfolio::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
