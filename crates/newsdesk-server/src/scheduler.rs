//! Background ingestion refresh.
//!
//! When `NEWSDESK_INGEST_CRON` is set, a [`JobScheduler`] runs the full
//! fetch → normalize → enrich → upsert pipeline on that schedule. Without it
//! the server serves reads only and ingestion happens via the CLI.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use newsdesk_core::AppConfig;
use newsdesk_enrich::{ClusterConfig, EmbedClient, EnrichConfig, ZeroShotClient};
use newsdesk_ingest::IngestConfig;

/// Builds and starts the background job scheduler, if a schedule is
/// configured.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised, the
/// job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<Option<JobScheduler>, JobSchedulerError> {
    let Some(cron) = config.ingest_cron.clone() else {
        tracing::info!("NEWSDESK_INGEST_CRON not set; background ingestion disabled");
        return Ok(None);
    };

    let scheduler = JobScheduler::new().await?;
    let pool = Arc::new(pool);

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting ingestion refresh");
            run_ingest_job(&pool, &config).await;
            tracing::info!("scheduler: ingestion refresh complete");
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(Some(scheduler))
}

/// Drive one full pipeline run. Failures are logged, never propagated — the
/// next tick simply tries again, and upsert-by-URL makes overlap harmless.
async fn run_ingest_job(pool: &PgPool, config: &AppConfig) {
    let sources = match IngestConfig::from_env() {
        Ok(sources) => sources,
        Err(e) => {
            tracing::warn!(error = %e, "scheduler: no news sources configured; skipping run");
            return;
        }
    };
    let enrich = match EnrichConfig::from_env() {
        Ok(enrich) => enrich,
        Err(e) => {
            tracing::warn!(error = %e, "scheduler: enrichment not configured; skipping run");
            return;
        }
    };

    let (articles, stats) = match newsdesk_ingest::collect_articles(config, &sources).await {
        Ok(batch) => batch,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: source client construction failed");
            return;
        }
    };

    if articles.is_empty() {
        tracing::info!(input = stats.input, "scheduler: nothing to ingest this run");
        return;
    }

    let classifier = ZeroShotClient::new(&enrich.classify_url);
    let embedder = EmbedClient::new(&enrich.embed_url);
    let cluster_config = ClusterConfig::from_app_config(config);

    let enriched =
        match newsdesk_enrich::enrich_articles(articles, &classifier, &embedder, &cluster_config)
            .await
        {
            Ok(enriched) => enriched,
            Err(e) => {
                tracing::error!(error = %e, "scheduler: enrichment failed; batch dropped");
                return;
            }
        };

    match newsdesk_db::upsert_articles(pool, &enriched).await {
        Ok(written) => {
            tracing::info!(written, "scheduler: pipeline run persisted");
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to persist batch");
        }
    }
}
