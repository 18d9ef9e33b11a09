mod app;
mod cli;
mod render;
mod runner;

use anyhow::Context;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    engine_logging::initialize(cli.log.into(), cli.log_level());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start the async runtime")?;
    let report = runtime.block_on(app::run(&cli))?;

    let mut stdout = std::io::stdout().lock();
    render::write_report(&mut stdout, &report, cli.format)
}
