// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模式的端到端流程：生产者 → 消费者 → 归档器
#[cfg(test)]
mod tests {
    use crate::integration::helpers::fixture_site::{deck_number, FixtureSite};
    use chrono::NaiveDate;
    use deck_harvester::domain::models::deck::{DeckRecord, DeckType};
    use deck_harvester::domain::models::message::MessageType;
    use deck_harvester::domain::models::query::{PageQuery, SearchTemplate};
    use deck_harvester::domain::models::registry::RunMode;
    use deck_harvester::infrastructure::deck_store::DeckStore;
    use deck_harvester::infrastructure::query_registry::QueryRegistry;
    use deck_harvester::infrastructure::storage::InMemoryStorage;
    use async_trait::async_trait;
    use deck_harvester::domain::models::message::QueueMessage;
    use deck_harvester::queue::message_queue::{
        InMemoryMessageQueue, MessageQueue, QueueError, ReceivedMessage,
    };
    use deck_harvester::utils::errors::WorkerError;
    use deck_harvester::workers::archiver::DeckArchiver;
    use deck_harvester::workers::consumer::DeckConsumer;
    use deck_harvester::workers::producer::DeckProducer;
    use std::sync::Arc;
    use std::time::Duration;

    const SEARCHES: &str = "deck-search-payloads-queue";
    const DECKS: &str = "downloaded-decks-queue";
    const REGISTRY_KEY: &str = "registry/queries.csv";
    const VISIBILITY: Duration = Duration::from_secs(30);

    /// 发送总是失败的队列
    struct UnavailableQueue;

    #[async_trait]
    impl MessageQueue for UnavailableQueue {
        async fn send(&self, _queue: &str, _message: &QueueMessage) -> Result<(), QueueError> {
            Err(QueueError::Encoding(
                serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            ))
        }

        async fn receive(
            &self,
            _queue: &str,
            _wait: Duration,
        ) -> Result<Option<ReceivedMessage>, QueueError> {
            Ok(None)
        }

        async fn ack(&self, _queue: &str, _received: &ReceivedMessage) -> Result<(), QueueError> {
            Ok(())
        }

        async fn requeue_expired(&self, _queue: &str) -> Result<usize, QueueError> {
            Ok(0)
        }
    }

    struct Pipeline {
        queue: InMemoryMessageQueue,
        storage: InMemoryStorage,
        producer: DeckProducer,
        consumer: DeckConsumer,
        archiver: DeckArchiver,
    }

    fn pipeline(site: FixtureSite) -> Pipeline {
        pipeline_with_queue(site, InMemoryMessageQueue::new())
    }

    fn pipeline_with_queue(site: FixtureSite, queue: InMemoryMessageQueue) -> Pipeline {
        let site = Arc::new(site);
        let context = site.context();
        let storage = InMemoryStorage::default();
        let shared_queue: Arc<dyn MessageQueue> = Arc::new(queue.clone());

        Pipeline {
            producer: DeckProducer::new(
                context.pagination(),
                QueryRegistry::new(Arc::new(storage.clone()), REGISTRY_KEY),
                shared_queue.clone(),
                SEARCHES,
            ),
            consumer: DeckConsumer::new(
                context.orchestrator(),
                shared_queue.clone(),
                SEARCHES,
                DECKS,
                Duration::ZERO,
            ),
            archiver: DeckArchiver::new(
                DeckStore::new(Arc::new(storage.clone())),
                shared_queue,
                DECKS,
                Duration::ZERO,
            ),
            queue,
            storage,
        }
    }

    fn template() -> SearchTemplate {
        serde_json::from_str(r#"{"format":"MO","date_start":"25/09/2021","date_end":"27/09/2021"}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn test_producer_queues_one_message_per_page() {
        let p = pipeline(FixtureSite::new(5, 2));

        let queued = p.producer.produce(&template(), RunMode::Manual).await.unwrap();

        assert_eq!(queued, 5);
        let messages = p.queue.pending(SEARCHES).await;
        let pages: Vec<u32> = messages
            .iter()
            .map(|m| {
                assert_eq!(m.msg_type(), MessageType::DeckSearchPayload);
                m.decode::<PageQuery>().unwrap().current_page()
            })
            .collect();
        assert_eq!(pages, vec![1, 2, 3, 4, 5]);

        let registry = QueryRegistry::new(Arc::new(p.storage.clone()), REGISTRY_KEY);
        let entries = registry.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].template, template());
        assert_eq!(entries[0].mode, RunMode::Manual);
    }

    #[tokio::test]
    async fn test_full_pipeline_archives_every_deck() {
        let p = pipeline(FixtureSite::new(3, 2));
        p.producer.produce(&template(), RunMode::Manual).await.unwrap();

        while p.consumer.run_once().await.unwrap() {}
        assert_eq!(p.queue.pending(DECKS).await.len(), 6);
        assert_eq!(p.queue.in_flight(SEARCHES).await, 0);

        while p.archiver.run_once().await.unwrap() {}
        assert_eq!(p.queue.in_flight(DECKS).await, 0);

        let store = DeckStore::new(Arc::new(p.storage.clone()));
        let keys: Vec<String> = p
            .storage
            .keys()
            .await
            .into_iter()
            .filter(|k| k.starts_with("decks/"))
            .collect();
        assert_eq!(keys.len(), 6);

        let deck_id = keys[0].trim_start_matches("decks/").trim_end_matches(".json");
        let deck: DeckRecord = store.load(deck_id).await.unwrap().unwrap();
        assert!(deck.is_enriched());
        assert_eq!(
            deck.deck_type,
            Some(DeckType::Named(format!("Archetype {}", deck.summary.deck_name.trim_start_matches("Deck "))))
        );
        assert!(deck.cards.unwrap().ends_with("1 Fire//Ice;\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_batch_sends_nothing_and_is_redelivered_after_visibility_timeout() {
        let broken = deck_number(2, 1);
        let queue = InMemoryMessageQueue::with_visibility_timeout(VISIBILITY);
        let p = pipeline_with_queue(FixtureSite::new(2, 2).with_broken_deck(&broken), queue);
        p.producer.produce(&template(), RunMode::Manual).await.unwrap();

        assert!(p.consumer.run_once().await.unwrap());
        assert_eq!(p.queue.pending(DECKS).await.len(), 2);

        assert!(p.consumer.run_once().await.unwrap());
        assert_eq!(p.queue.pending(DECKS).await.len(), 2);
        assert_eq!(p.queue.in_flight(SEARCHES).await, 1);

        // Still invisible while the delivery is within its timeout
        assert!(!p.consumer.run_once().await.unwrap());

        tokio::time::advance(VISIBILITY + Duration::from_secs(1)).await;
        assert!(p.queue.pending(SEARCHES).await.is_empty());

        assert!(p.consumer.run_once().await.unwrap());
        assert_eq!(p.queue.in_flight(SEARCHES).await, 1);
        assert_eq!(p.queue.pending(DECKS).await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_failure_is_retried_while_consumer_runs() {
        let queue = InMemoryMessageQueue::with_visibility_timeout(VISIBILITY);
        let shared_queue: Arc<dyn MessageQueue> = Arc::new(queue.clone());
        let query = PageQuery::new(template(), 1).unwrap();
        let message = QueueMessage::search_payload(&query, chrono::Utc::now()).unwrap();
        shared_queue.send(SEARCHES, &message).await.unwrap();

        let site = Arc::new(FixtureSite::new(2, 1).failing());
        let consumer = DeckConsumer::new(
            site.context().orchestrator(),
            shared_queue,
            SEARCHES,
            DECKS,
            Duration::ZERO,
        );

        assert!(consumer.run_once().await.unwrap());
        assert!(!consumer.run_once().await.unwrap());

        tokio::time::advance(VISIBILITY).await;

        assert!(consumer.run_once().await.unwrap());
        assert_eq!(queue.in_flight(SEARCHES).await, 1);
        assert!(queue.pending(SEARCHES).await.is_empty());
        assert!(queue.pending(DECKS).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_leaves_registry_untouched() {
        let site = Arc::new(FixtureSite::new(3, 1));
        let storage = InMemoryStorage::default();
        let registry = || QueryRegistry::new(Arc::new(storage.clone()), REGISTRY_KEY);
        let producer = DeckProducer::new(
            site.context().pagination(),
            registry(),
            Arc::new(UnavailableQueue),
            SEARCHES,
        );

        let err = producer.produce(&template(), RunMode::Manual).await.unwrap_err();

        assert!(matches!(err, WorkerError::Queue(_)));
        assert!(registry().entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_consumer_rejects_deck_messages() {
        let p = pipeline(FixtureSite::new(1, 1));
        p.producer.produce(&template(), RunMode::Manual).await.unwrap();
        while p.consumer.run_once().await.unwrap() {}
        let deck_message = p.queue.pending(DECKS).await.remove(0);

        let err = p.consumer.handle(&deck_message).await.unwrap_err();

        assert!(matches!(
            err,
            WorkerError::UnexpectedMessage { ref expected, ref found }
                if expected == "deck_search_payload" && found == "full_deck"
        ));
    }

    #[tokio::test]
    async fn test_automated_run_continues_from_registry() {
        let p = pipeline(FixtureSite::new(2, 1));
        p.producer.produce(&template(), RunMode::Manual).await.unwrap();

        let queued = p
            .producer
            .produce_automated(NaiveDate::from_ymd_opt(2021, 10, 4).unwrap())
            .await
            .unwrap();

        assert_eq!(queued, 2);
        let registry = QueryRegistry::new(Arc::new(p.storage.clone()), REGISTRY_KEY);
        let entries = registry.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].mode, RunMode::Automated);
        assert_eq!(entries[1].template.date_start(), "27/09/2021");
        assert_eq!(entries[1].template.date_end(), "04/10/2021");
    }

    #[tokio::test]
    async fn test_automated_run_needs_a_registry() {
        let p = pipeline(FixtureSite::new(2, 1));

        let err = p
            .producer
            .produce_automated(NaiveDate::from_ymd_opt(2021, 10, 4).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkerError::Registry(_)));
        assert!(p.queue.pending(SEARCHES).await.is_empty());
    }
}
