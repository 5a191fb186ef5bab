//! CLI module for PMP Knowledge Desk
//!
//! Provides subcommands:
//! - `ingest`: process files into the knowledge store
//! - `ask`: run a query through the full pipeline
//! - `graph`: render the router state graph
//! - `agents`: list the specialists

pub mod agents;
pub mod ask;
pub mod graph;
pub mod ingest;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// PMP Knowledge Desk - domain-routed answers grounded in your documents
#[derive(Parser)]
#[command(name = "pmp-knowledge-desk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process documents and add them to the knowledge store
    Ingest(ingest::IngestArgs),

    /// Ask a question
    Ask(ask::AskArgs),

    /// Render the routing graph
    Graph(graph::GraphArgs),

    /// List the available specialists
    Agents,
}

/// Load `.env`, configuration and logging
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);
    config.validate()?;

    Ok(config)
}
