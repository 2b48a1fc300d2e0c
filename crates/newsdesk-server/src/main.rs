mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use newsdesk_chat::{ChatConfig, ChatService, GeminiClient};
use newsdesk_enrich::EmbedClient;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(newsdesk_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = newsdesk_db::PoolConfig::from_app_config(&config);
    let pool = newsdesk_db::connect_pool(&config.database_url, pool_config).await?;
    newsdesk_db::run_migrations(&pool).await?;

    let _scheduler = scheduler::build_scheduler(pool.clone(), Arc::clone(&config)).await?;

    let chat = build_chat_service(&pool);
    let app = build_app(AppState {
        pool,
        config: Arc::clone(&config),
        chat,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "newsdesk API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Wire the chatbot if its credentials are present.
///
/// Missing credentials disable only the chatbot: the server still starts and
/// serves highlights, and `/chatbot/ask` answers that it is not configured.
fn build_chat_service(pool: &PgPool) -> Option<Arc<ChatService>> {
    let chat_config = match ChatConfig::from_env() {
        Ok(chat_config) => chat_config,
        Err(e) => {
            tracing::warn!(reason = %e, "chatbot disabled");
            return None;
        }
    };

    let Ok(embed_url) = std::env::var("NEWSDESK_EMBED_URL") else {
        tracing::warn!(reason = "NEWSDESK_EMBED_URL not set", "chatbot disabled");
        return None;
    };

    let model = match GeminiClient::new(
        &chat_config.api_key,
        &chat_config.model,
        chat_config.request_timeout_secs,
    ) {
        Ok(model) => model,
        Err(e) => {
            tracing::warn!(error = %e, "chatbot disabled: could not build model client");
            return None;
        }
    };

    Some(Arc::new(ChatService::new(
        pool.clone(),
        Arc::new(EmbedClient::new(&embed_url)),
        Arc::new(model),
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
