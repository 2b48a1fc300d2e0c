//! The `highlights` command: windowed read + rank + human-readable print.

use chrono::{Duration, Utc};

use newsdesk_core::{AppConfig, Article, CATEGORIES};
use newsdesk_enrich::{rank, rank_by_category, Highlight, RankConfig};

pub(crate) async fn run(config: &AppConfig, per_category: bool) -> anyhow::Result<()> {
    let pool_config = newsdesk_db::PoolConfig::from_app_config(config);
    let pool = newsdesk_db::connect_pool(&config.database_url, pool_config).await?;

    let since = Utc::now() - Duration::hours(config.highlight_window_hours);
    let rows = newsdesk_db::list_clustered_since(&pool, since).await?;
    let articles: Vec<Article> = rows.into_iter().map(Article::from).collect();

    let rank_config = RankConfig {
        top_k: config.highlight_top_k,
        ..RankConfig::default()
    };

    if per_category {
        let partitions = rank_by_category(&articles, &rank_config, &CATEGORIES)?;
        for (category, highlights) in &partitions {
            println!("\n=== {category} ===");
            if highlights.is_empty() {
                println!("(no recent story clusters)");
                continue;
            }
            print_highlights(highlights);
        }
    } else {
        let highlights = rank(&articles, &rank_config)?;
        println!("\n--- TOP NEWS HIGHLIGHTS ---\n");
        if highlights.is_empty() {
            println!("(no recent story clusters)");
        } else {
            print_highlights(&highlights);
        }
    }

    Ok(())
}

fn print_highlights(highlights: &[Highlight]) {
    for (i, highlight) in highlights.iter().enumerate() {
        println!("{}. {}", i + 1, highlight.article.title);
        println!(
            "   Category: {} | Score: {}",
            highlight.article.category.as_deref().unwrap_or("-"),
            highlight.score
        );
        println!(
            "   Frequency: {} | Sources: {}",
            highlight.frequency,
            highlight.sources.join(", ")
        );
        println!("{}", "-".repeat(20));
    }
}
