//! covid-cli - Command line tool for querying COVID-19 case, death and
//! vaccination datasets.

use clap::Parser;
use covid_cmd::{Command, OutputArgs, SourceArgs};

#[derive(Parser)]
#[command(
    name = "covid-cli",
    version,
    about = "COVID-19 dataset loader and query toolkit"
)]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("sources: {:?}", cli.sources);
    covid_cmd::run(cli.command, cli.sources, cli.output).await
}
