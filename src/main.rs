use clap::Parser;

use island_tour::cli::Cli;
use island_tour::{app, TourConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = TourConfig::resolve(&cli)?;

    log::info!("Island tour - buttons 1-9 select a view, B goes back, Escape quits");
    app::run(config)
}
