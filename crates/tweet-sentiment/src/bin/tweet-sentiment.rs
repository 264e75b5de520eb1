use anyhow::Result;
use clap::Parser;
use tweet_sentiment::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::run(&cli)
}
