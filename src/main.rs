use clap::Parser;
use pmp_knowledge_desk::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Ingest(args) => cli::ingest::run(args).await,
        Command::Ask(args) => cli::ask::run(args).await,
        Command::Graph(args) => cli::graph::run(args).await,
        Command::Agents => cli::agents::run().await,
    }
}
