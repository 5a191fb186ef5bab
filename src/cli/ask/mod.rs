//! Ask command - runs one query through the knowledge desk

use clap::Args;

use crate::domain::Scope;

/// Arguments for the ask command
#[derive(Args, Clone)]
pub struct AskArgs {
    /// The question
    pub query: String,

    /// Tenant scope to search
    #[arg(long, default_value = Scope::DEFAULT)]
    pub scope: String,

    /// Print the full reply as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the ask command
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let desk = crate::create_desk_with_config(&config).await?;

    let reply = desk.ask(&args.query, &Scope::new(args.scope)).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("[{}] {}", reply.specialist, reply.message);
    }

    Ok(())
}
