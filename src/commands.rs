use std::path::Path;

use anyhow::Context;
use docent_core::bootstrap::{
    create_chunker, create_embedder, open_chunk_store, open_learning_store,
};
use docent_core::config::Config;
use docent_index::{ChunkStore, Ingestor, format_as_context};
use docent_memory::Interaction;

pub(crate) async fn ingest(config: &Config, dir: &Path, append: bool) -> anyhow::Result<()> {
    let embedder = create_embedder(config)?;
    let store = if append {
        open_chunk_store(config, embedder)?
    } else {
        ChunkStore::new(embedder)
    };

    let report = Ingestor::new(&store, create_chunker(config))
        .ingest_dir(dir)
        .await
        .with_context(|| format!("ingestion of {} failed", dir.display()))?;

    let store_path = Path::new(&config.index.store_path);
    store
        .save(store_path)
        .with_context(|| format!("failed to save chunk store {}", store_path.display()))?;

    println!(
        "ingested {} chunks from {}/{} files in {} ms ({} chunks stored)",
        report.chunks_created,
        report.files_ingested,
        report.files_scanned,
        report.duration_ms,
        store.len()?,
    );
    Ok(())
}

pub(crate) async fn search(
    config: &Config,
    query: &str,
    limit: usize,
    context: bool,
) -> anyhow::Result<()> {
    let store = open_chunk_store(config, create_embedder(config)?)?;
    let hits = store.search(query, limit).await?;

    if context {
        println!("{}", format_as_context(&hits));
        return Ok(());
    }
    if hits.is_empty() {
        println!("no matching chunks");
        return Ok(());
    }
    for hit in &hits {
        let meta = &hit.chunk.metadata;
        println!(
            "{:.3}  {}  [{} / {}] {}",
            hit.score,
            hit.chunk.id(),
            meta.command,
            meta.section_type,
            meta.topic
        );
    }
    Ok(())
}

pub(crate) fn record(
    config: &Config,
    query: String,
    response: String,
    chunks: Vec<String>,
    successful: bool,
) -> anyhow::Result<()> {
    let learning = open_learning_store(config)?;
    let interaction = learning.record_interaction(Interaction::new(query, response, chunks, successful))?;
    println!("recorded interaction {}", interaction.id);
    for adj in &interaction.adjustments {
        println!("  {}  {:.4} -> {:.4}", adj.chunk_id, adj.previous, adj.updated);
    }
    Ok(())
}

pub(crate) fn score(config: &Config, chunk_id: &str) -> anyhow::Result<()> {
    let learning = open_learning_store(config)?;
    println!("{:.4}", learning.chunk_score(chunk_id)?);
    Ok(())
}

pub(crate) fn pattern(config: &Config, canonical: &str, variation: &str) -> anyhow::Result<()> {
    let learning = open_learning_store(config)?;
    if !learning.add_query_pattern(canonical, variation)? {
        println!("already known");
    }
    println!("{canonical}: {}", learning.query_variations(canonical)?.join(", "));
    Ok(())
}

pub(crate) fn alias(config: &Config, command: &str, alias: &str) -> anyhow::Result<()> {
    let learning = open_learning_store(config)?;
    if !learning.add_command_alias(command, alias)? {
        println!("already known");
    }
    println!("{command}: {}", learning.command_aliases(command)?.join(", "));
    Ok(())
}

pub(crate) fn stats(config: &Config) -> anyhow::Result<()> {
    let stats = open_learning_store(config)?.stats()?;
    println!("interactions:  {}", stats.total_interactions);
    println!("successful:    {}", stats.successful_interactions);
    println!("success rate:  {:.1}%", stats.success_rate() * 100.0);
    println!("scored chunks: {}", stats.scored_chunks);
    Ok(())
}
