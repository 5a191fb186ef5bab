//! Ingest command - processes files into the knowledge store

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::domain::Scope;

/// Arguments for the ingest command
#[derive(Args, Clone)]
pub struct IngestArgs {
    /// Files to ingest (.pdf, .docx, .txt, .doc)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Tenant scope the documents belong to
    #[arg(long, default_value = Scope::DEFAULT)]
    pub scope: String,
}

/// Run the ingest command
pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let desk = crate::create_desk_with_config(&config).await?;
    let scope = Scope::new(args.scope);

    let mut failures = 0usize;
    for path in &args.paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let report = desk.ingest(bytes, &filename, &scope).await;
        println!("{}", report.summary());
        if report.success {
            println!(
                "  chunks: {}  pages: {}  characters: {}",
                report.num_chunks, report.num_pages, report.text_length
            );
        } else {
            failures += 1;
        }
    }

    let stats = desk.store().stats().await;
    info!(
        total_chunks = stats.total_chunks,
        sources = stats.sources,
        vector_mode = stats.vector_mode,
        "Ingestion finished"
    );

    if failures > 0 {
        anyhow::bail!("{} of {} documents failed", failures, args.paths.len());
    }

    Ok(())
}
