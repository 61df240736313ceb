// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP提交接口测试
#[cfg(test)]
mod tests {
    use crate::integration::helpers::fixture_site::FixtureSite;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use chrono::Utc;
    use deck_harvester::domain::models::query::{Format, SearchTemplate};
    use deck_harvester::domain::models::registry::{RegistryEntry, RunMode};
    use deck_harvester::infrastructure::query_registry::QueryRegistry;
    use deck_harvester::infrastructure::storage::InMemoryStorage;
    use deck_harvester::presentation::routes::{routes, AppState};
    use deck_harvester::queue::message_queue::InMemoryMessageQueue;
    use deck_harvester::workers::producer::DeckProducer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SEARCHES: &str = "deck-search-payloads-queue";
    const REGISTRY_KEY: &str = "registry/queries.csv";

    fn app(site: FixtureSite) -> (Router, InMemoryMessageQueue) {
        app_with_storage(site, InMemoryStorage::default())
    }

    fn app_with_storage(
        site: FixtureSite,
        storage: InMemoryStorage,
    ) -> (Router, InMemoryMessageQueue) {
        let site = Arc::new(site);
        let queue = InMemoryMessageQueue::new();
        let producer = DeckProducer::new(
            site.context().pagination(),
            QueryRegistry::new(Arc::new(storage), REGISTRY_KEY),
            Arc::new(queue.clone()),
            SEARCHES,
        );
        let router = routes(AppState {
            producer: Arc::new(producer),
        });
        (router, queue)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(FixtureSite::new(1, 1));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_submit_search_queues_pages() {
        let (app, queue) = app(FixtureSite::new(5, 1));

        let response = app
            .oneshot(post_json(
                "/v1/searches",
                r#"{"format":"MO","date_start":"25/09/2021","date_end":"27/09/2021"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(json_body(response).await, json!({ "queued": 5 }));
        assert_eq!(queue.pending(SEARCHES).await.len(), 5);
    }

    #[tokio::test]
    async fn test_invalid_template_is_bad_request() {
        let (app, queue) = app(FixtureSite::new(5, 1));

        let response = app
            .oneshot(post_json(
                "/v1/searches",
                r#"{"format":"ZZ","date_start":"25/09/2021","date_end":"27/09/2021"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(queue.pending(SEARCHES).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_search_is_bad_request() {
        let (app, _) = app(FixtureSite::new(0, 1));

        let response = app
            .oneshot(post_json(
                "/v1/searches",
                r#"{"format":"MO","date_start":"25/09/2021","date_end":"27/09/2021"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let (app, _) = app(FixtureSite::new(5, 1).failing());

        let response = app
            .oneshot(post_json(
                "/v1/searches",
                r#"{"format":"MO","date_start":"25/09/2021","date_end":"27/09/2021"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_automated_search_without_registry_conflicts() {
        let (app, _) = app(FixtureSite::new(5, 1));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/searches/automated")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_automated_search_before_last_range_ends_conflicts() {
        let storage = InMemoryStorage::default();
        let template = SearchTemplate::new(Format::Modern, "01/12/2099", "31/12/2099").unwrap();
        QueryRegistry::new(Arc::new(storage.clone()), REGISTRY_KEY)
            .append(&RegistryEntry::new(template, Utc::now(), RunMode::Manual))
            .await
            .unwrap();
        let (app, queue) = app_with_storage(FixtureSite::new(5, 1), storage);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/searches/automated")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(queue.pending(SEARCHES).await.is_empty());
    }
}
