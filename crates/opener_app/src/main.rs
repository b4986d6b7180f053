//! `bulk_open`: open a list of URLs in paced batches.
//!
//! ```bash
//! bulk_open urls.txt                          # first batch of 10, then exit
//! bulk_open urls.txt -b 0 -c 3 --min-delay 2  # everything, three at a time
//! bulk_open urls.txt --interactive            # pause/resume/continue from the keyboard
//! cat urls.txt | bulk_open --dry-run -f shop
//! ```

mod app;
mod cli;
mod commands;
mod effects;
mod render;
mod settings;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let (destination, level) = cli.log_setup();
    opener_logging::initialize(destination, level);

    app::run_app(cli)
}
