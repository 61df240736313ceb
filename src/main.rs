// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use deck_harvester::application::use_cases::scrape_context::ScrapeContext;
use deck_harvester::cli::{Cli, Command};
use deck_harvester::config::settings::Settings;
use deck_harvester::domain::models::query::SearchTemplate;
use deck_harvester::domain::models::registry::RunMode;
use deck_harvester::domain::repositories::storage_repository::StorageRepository;
use deck_harvester::infrastructure::deck_store::DeckStore;
use deck_harvester::infrastructure::metrics::init_metrics;
use deck_harvester::infrastructure::query_registry::QueryRegistry;
use deck_harvester::infrastructure::redis_client::RedisClient;
use deck_harvester::infrastructure::storage::create_storage_repository;
use deck_harvester::presentation::routes::{self, AppState};
use deck_harvester::queue::message_queue::{MessageQueue, RedisMessageQueue};
use deck_harvester::utils::telemetry;
use deck_harvester::workers::archiver::DeckArchiver;
use deck_harvester::workers::consumer::DeckConsumer;
use deck_harvester::workers::manager::WorkerManager;
use deck_harvester::workers::pool::LocalPool;
use deck_harvester::workers::producer::DeckProducer;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并执行子命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new().context("failed to load settings")?;

    telemetry::init_telemetry(cli.json_logs || settings.telemetry.json);
    info!("Starting deck-harvester...");

    if settings.metrics.enabled {
        init_metrics(&settings.metrics.listen_addr);
    }

    let storage = create_storage_repository(&settings.storage).await?;
    let context = ScrapeContext::from_settings(&settings.site)?;

    match cli.command {
        Command::Local {
            payload,
            parallelism,
            store,
        } => {
            let template: SearchTemplate =
                serde_json::from_str(&payload).context("invalid search payload")?;
            let pool = LocalPool::new(
                context,
                parallelism.unwrap_or(settings.workers.local_parallelism),
            );
            let decks = pool.collect(&template).await?;

            if store {
                let deck_store = DeckStore::new(storage);
                for deck in &decks {
                    deck_store.save(deck).await?;
                }
                info!("Archived {} decks", decks.len());
            }

            println!("{}", serde_json::to_string_pretty(&decks)?);
        }
        Command::Produce { payload } => {
            let producer = build_producer(&settings, &context, storage, connect_queue(&settings)?);
            let queued = match payload {
                Some(payload) => {
                    let template: SearchTemplate =
                        serde_json::from_str(&payload).context("invalid search payload")?;
                    producer.produce(&template, RunMode::Manual).await?
                }
                None => producer.produce_automated(Local::now().date_naive()).await?,
            };
            info!("Queued {} search pages", queued);
        }
        Command::Consume => {
            let queue = connect_queue(&settings)?;
            let poll_timeout = Duration::from_secs(settings.queue.poll_timeout_secs);

            let consumer = DeckConsumer::new(
                context.orchestrator(),
                queue.clone(),
                settings.queue.search_queue.clone(),
                settings.queue.deck_queue.clone(),
                poll_timeout,
            );
            let archiver = DeckArchiver::new(
                DeckStore::new(storage),
                queue,
                settings.queue.deck_queue.clone(),
                poll_timeout,
            );

            let mut manager = WorkerManager::new();
            manager.start_workers(Arc::new(consumer), settings.workers.consumers);
            manager.start_workers(Arc::new(archiver), settings.workers.archivers);
            manager.wait_for_shutdown().await;
        }
        Command::Serve => {
            let producer = build_producer(&settings, &context, storage, connect_queue(&settings)?);
            let app = routes::routes(AppState {
                producer: Arc::new(producer),
            });

            let addr = format!("{}:{}", settings.server.host, settings.server.port);
            let listener = TcpListener::bind(&addr).await?;
            info!("Listening on {}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }
    }

    Ok(())
}

fn connect_queue(settings: &Settings) -> anyhow::Result<Arc<dyn MessageQueue>> {
    let client = RedisClient::new(&settings.queue.redis_url)
        .with_context(|| format!("invalid redis url {}", settings.queue.redis_url))?;
    Ok(Arc::new(RedisMessageQueue::new(
        client,
        Duration::from_secs(settings.queue.visibility_timeout_secs),
    )))
}

fn build_producer(
    settings: &Settings,
    context: &ScrapeContext,
    storage: Arc<dyn StorageRepository>,
    queue: Arc<dyn MessageQueue>,
) -> DeckProducer {
    DeckProducer::new(
        context.pagination(),
        QueryRegistry::new(storage, settings.registry.key.clone()),
        queue,
        settings.queue.search_queue.clone(),
    )
}
