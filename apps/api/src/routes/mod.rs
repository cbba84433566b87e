pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::generation::handlers;
use crate::state::AppState;

/// Builds the full router. CORS is permissive (`Access-Control-Allow-Origin: *`)
/// and answers OPTIONS preflights for every route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route(
            "/api/v1/diagnose-student",
            post(handlers::handle_diagnose_student),
        )
        .route(
            "/api/v1/generate-courseware",
            post(handlers::handle_generate_courseware),
        )
        .route(
            "/api/v1/parse-document",
            post(handlers::handle_parse_document),
        )
        .route(
            "/api/v1/generate-practice-script",
            post(handlers::handle_generate_practice_script),
        )
        .route(
            "/api/v1/generate-training-plan",
            post(handlers::handle_generate_training_plan),
        )
        // Record status
        .route("/api/v1/documents/:id", get(handlers::handle_get_document))
        .route(
            "/api/v1/documents/:id/parse",
            post(handlers::handle_queue_document_parse),
        )
        .route(
            "/api/v1/coursewares/:id",
            get(handlers::handle_get_courseware),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::generation::document::test_support::StaticLoader;
    use crate::generation::generator::test_support::ScriptedModel;
    use crate::llm_client::{ChatModel, LlmError};
    use crate::models::RecordStatus;
    use crate::store::{InMemoryRecordStore, RecordStore};

    fn test_state(llm: Arc<ScriptedModel>, store: InMemoryRecordStore) -> AppState {
        AppState {
            llm: llm as Arc<dyn ChatModel>,
            store: Arc::new(store),
            loader: Arc::new(StaticLoader(None)),
            config: Config::for_tests(),
        }
    }

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = build_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let llm = Arc::new(ScriptedModel::new(vec![]));
        let (status, body) = send(test_state(llm, InMemoryRecordStore::new()), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_empty_documents_rejected_without_upstream_call() {
        let llm = Arc::new(ScriptedModel::replying("{}"));
        let state = test_state(llm.clone(), InMemoryRecordStore::new());

        let (status, body) = send(
            state,
            post_json(
                "/api/v1/generate-courseware",
                json!({"coursewareId": Uuid::new_v4(), "title": "入门", "documents": []}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let llm = Arc::new(ScriptedModel::replying("{}"));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/generate-training-plan")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, _) = send(test_state(llm.clone(), InMemoryRecordStore::new()), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_429() {
        let llm = Arc::new(ScriptedModel::failing(LlmError::RateLimited));
        let (status, body) = send(
            test_state(llm, InMemoryRecordStore::new()),
            post_json(
                "/api/v1/generate-practice-script",
                json!({"prompt": "价格异议", "practiceMode": "text"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "RATE_LIMITED");
    }

    #[tokio::test]
    async fn test_quota_maps_to_402() {
        let llm = Arc::new(ScriptedModel::failing(LlmError::QuotaExhausted));
        let (status, body) = send(
            test_state(llm, InMemoryRecordStore::new()),
            post_json(
                "/api/v1/generate-training-plan",
                json!({"prompt": "新人培训"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["error"]["code"], "QUOTA_EXHAUSTED");
    }

    #[tokio::test]
    async fn test_generic_upstream_failure_maps_to_500() {
        let llm = Arc::new(ScriptedModel::failing(LlmError::Api {
            status: 500,
            message: "boom".to_string(),
        }));
        let (status, body) = send(
            test_state(llm, InMemoryRecordStore::new()),
            post_json(
                "/api/v1/generate-practice-script",
                json!({"prompt": "p", "practiceMode": "voice"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_unparsable_diagnosis_is_degraded_success() {
        let llm = Arc::new(ScriptedModel::replying("诊断如下：学生表现良好。"));
        let (status, body) = send(
            test_state(llm, InMemoryRecordStore::new()),
            post_json(
                "/api/v1/diagnose-student",
                json!({
                    "studentName": "李娜",
                    "radarData": [{"subject": "产品知识", "score": 88, "fullMark": 100}],
                    "practiceHistory": []
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["degraded"], true);
        assert_eq!(body["diagnosis"]["dimensionAnalysis"][0]["dimension"], "产品知识");
    }

    #[tokio::test]
    async fn test_parse_document_marks_record_ready() {
        let id = Uuid::new_v4();
        let store = InMemoryRecordStore::new();
        store.insert_document(id, RecordStatus::Processing).await;
        let llm = Arc::new(ScriptedModel::replying(
            "```json\n{\"summary\": \"《销售手册》介绍了标准销售流程。\", \"keyPoints\": [\"需求挖掘\", \"异议处理\"]}\n```",
        ));

        let (status, body) = send(
            test_state(llm.clone(), store.clone()),
            post_json(
                "/api/v1/parse-document",
                json!({
                    "documentId": id,
                    "fileUrl": "https://storage.example.com/docs/sales.pdf",
                    "fileName": "销售手册"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["degraded"], false);
        assert_eq!(body["keyPoints"], json!(["需求挖掘", "异议处理"]));

        let row = store.get_document(id).await.unwrap();
        assert_eq!(row.status(), Some(RecordStatus::Ready));
        assert!(!row.ai_summary.unwrap_or_default().is_empty());
        assert_eq!(row.key_points, Some(json!(["需求挖掘", "异议处理"])));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_queued_parse_completes_in_background() {
        let id = Uuid::new_v4();
        let store = InMemoryRecordStore::new();
        store.insert_document(id, RecordStatus::Processing).await;
        let llm = Arc::new(ScriptedModel::replying(
            r#"{"summary": "产品培训资料", "keyPoints": ["功能", "价格"]}"#,
        ));

        let (status, body) = send(
            test_state(llm, store.clone()),
            post_json(
                &format!("/api/v1/documents/{id}/parse"),
                json!({"fileUrl": "https://storage.example.com/p.txt", "fileName": "p.txt"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "processing");

        let mut ready = false;
        for _ in 0..100 {
            let row = store.get_document(id).await.unwrap();
            if row.status() == Some(RecordStatus::Ready) {
                ready = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(ready, "background parse never marked the document ready");
    }

    #[tokio::test]
    async fn test_queued_parse_of_unknown_document_is_404() {
        let llm = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send(
            test_state(llm.clone(), InMemoryRecordStore::new()),
            post_json(
                &format!("/api/v1/documents/{}/parse", Uuid::new_v4()),
                json!({"fileUrl": "https://storage.example.com/p.txt", "fileName": "p.txt"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(llm.calls(), 0);
    }

    /// Loader that never finishes, holding a queued parse in flight.
    struct PendingLoader;

    #[async_trait::async_trait]
    impl crate::generation::document_loader::DocumentLoader for PendingLoader {
        async fn load_text(&self, _file_url: &str, _file_name: &str) -> anyhow::Result<String> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_queued_parse_resets_ready_record_before_accepting() {
        let id = Uuid::new_v4();
        let store = InMemoryRecordStore::new();
        store.insert_document(id, RecordStatus::Ready).await;
        let state = AppState {
            llm: Arc::new(ScriptedModel::replying("{}")) as Arc<dyn ChatModel>,
            store: Arc::new(store.clone()),
            loader: Arc::new(PendingLoader),
            config: Config::for_tests(),
        };

        let (status, _) = send(
            state.clone(),
            post_json(
                &format!("/api/v1/documents/{id}/parse"),
                json!({"fileUrl": "https://storage.example.com/p.txt", "fileName": "p.txt"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (status, body) = send(state, get_request(&format!("/api/v1/documents/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "processing");
    }

    #[tokio::test]
    async fn test_queued_parse_validates_before_spawning() {
        let llm = Arc::new(ScriptedModel::replying("{}"));
        let (status, _) = send(
            test_state(llm.clone(), InMemoryRecordStore::new()),
            post_json(
                &format!("/api/v1/documents/{}/parse", Uuid::new_v4()),
                json!({"fileName": "p.txt"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_document_is_404() {
        let llm = Arc::new(ScriptedModel::new(vec![]));
        let (status, body) = send(
            test_state(llm, InMemoryRecordStore::new()),
            get_request(&format!("/api/v1/documents/{}", Uuid::new_v4())),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_courseware_record_is_readable_after_generation() {
        let id = Uuid::new_v4();
        let store = InMemoryRecordStore::new();
        store.insert_courseware(id, RecordStatus::Processing).await;
        let llm = Arc::new(ScriptedModel::replying("not json at all"));

        let (status, body) = send(
            test_state(llm.clone(), store.clone()),
            post_json(
                "/api/v1/generate-courseware",
                json!({
                    "coursewareId": id,
                    "title": "产品知识",
                    "documents": [{"name": "销售手册", "keyPoints": ["a", "b"]}]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded"], true);

        let (status, body) = send(
            test_state(llm, store),
            get_request(&format!("/api/v1/coursewares/{id}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert!(body["outline"].as_array().unwrap().len() >= 3);
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_any_origin() {
        let llm = Arc::new(ScriptedModel::new(vec![]));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/parse-document")
            .header("origin", "https://admin.example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = build_router(test_state(llm.clone(), InMemoryRecordStore::new()))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
        assert_eq!(llm.calls(), 0);
    }
}
