mod cli;
mod db;
mod import;

use clap::Parser;
use colored::Colorize;

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = cli::Cli::parse();
    if let Err(e) = cli::handler::handle_import(cli).await {
        eprintln!("{} {:#}", "✗".red(), e);
        std::process::exit(1);
    }
}
