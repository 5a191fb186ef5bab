//! Graph command - renders the router state graph

use clap::{Args, ValueEnum};

use crate::domain::RouterState;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum GraphFormat {
    #[default]
    Ascii,
    Mermaid,
}

/// Arguments for the graph command
#[derive(Args, Clone)]
pub struct GraphArgs {
    #[arg(long, value_enum, default_value_t = GraphFormat::Ascii)]
    pub format: GraphFormat,
}

pub fn render(format: GraphFormat) -> String {
    match format {
        GraphFormat::Ascii => RouterState::render_ascii(),
        GraphFormat::Mermaid => RouterState::render_mermaid(),
    }
}

/// Run the graph command
pub async fn run(args: GraphArgs) -> anyhow::Result<()> {
    println!("{}", render(args.format));
    Ok(())
}
