//! The `ingest` command: fetch → normalize → enrich → upsert.
//!
//! Per-source fetch failures are logged and skipped inside the collector so a
//! single outage does not abort the run; an enrichment failure aborts the
//! batch (nothing is written), and re-running is safe because persistence is
//! an upsert by URL.

use anyhow::Context;

use newsdesk_core::AppConfig;
use newsdesk_enrich::{ClusterConfig, EmbedClient, EnrichConfig, ZeroShotClient};
use newsdesk_ingest::IngestConfig;

pub(crate) async fn run(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let sources = IngestConfig::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("ingestion sources are not configured")?;

    let (articles, stats) = newsdesk_ingest::collect_articles(config, &sources).await?;
    println!(
        "collected {} raw records; kept {} ({} missing fields, {} bad timestamps, {} duplicates)",
        stats.input, stats.kept, stats.missing_fields, stats.bad_timestamps, stats.duplicates
    );

    if dry_run {
        println!("dry run: skipping enrichment and persistence");
        return Ok(());
    }

    if articles.is_empty() {
        println!("nothing to ingest");
        return Ok(());
    }

    let enrich = EnrichConfig::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("enrichment services are not configured")?;

    let classifier = ZeroShotClient::new(&enrich.classify_url);
    let embedder = EmbedClient::new(&enrich.embed_url);
    let cluster_config = ClusterConfig::from_app_config(config);

    let enriched =
        newsdesk_enrich::enrich_articles(articles, &classifier, &embedder, &cluster_config)
            .await
            .context("enrichment failed; batch not persisted")?;

    let clustered = enriched
        .iter()
        .filter(|article| article.is_clustered())
        .count();
    println!(
        "enriched {} articles ({} in story clusters, {} singletons)",
        enriched.len(),
        clustered,
        enriched.len() - clustered
    );

    let pool_config = newsdesk_db::PoolConfig::from_app_config(config);
    let pool = newsdesk_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to the article store")?;
    newsdesk_db::run_migrations(&pool).await?;

    let written = newsdesk_db::upsert_articles(&pool, &enriched).await?;
    println!("upserted {written} articles");

    Ok(())
}
