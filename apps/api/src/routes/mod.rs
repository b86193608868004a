pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::ats::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring
        .route("/api/v1/ats/score", post(handlers::handle_score))
        // Analysis records
        .route(
            "/api/v1/ats/analyses",
            get(handlers::handle_list).post(handlers::handle_analyze),
        )
        .route(
            "/api/v1/ats/analyses/:id",
            get(handlers::handle_get).delete(handlers::handle_delete),
        )
        .route(
            "/api/v1/ats/analyses/:id/visibility",
            patch(handlers::handle_set_visibility),
        )
        // Aggregates
        .route("/api/v1/ats/analytics", get(handlers::handle_analytics))
        .route("/api/v1/ats/insights", get(handlers::handle_insights))
        .route("/api/v1/ats/stats", get(handlers::handle_stats))
        // Public sharing
        .route(
            "/api/v1/public/ats/:token",
            get(handlers::handle_get_public),
        )
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::ats::service::AtsService;
    use crate::ats::tips::RuleTipWriter;
    use crate::auth::USER_ID_HEADER;
    use crate::config::Config;
    use crate::store::memory::MemoryAnalysisStore;

    const BOUNDARY: &str = "ats-test-boundary";

    async fn app() -> (Router, Uuid) {
        let store = Arc::new(MemoryAnalysisStore::new());
        let owner = Uuid::new_v4();
        store.register_user(owner, Some("Grace Hopper")).await;
        let state = AppState {
            ats: AtsService::new(store, Arc::new(RuleTipWriter)),
            config: Config {
                database_url: "postgres://unused".to_string(),
                db_max_connections: 1,
                anthropic_api_key: None,
                enable_llm_tips: false,
                max_upload_bytes: 10 * 1024 * 1024,
                port: 0,
                rust_log: "info".to_string(),
            },
        };
        (build_router(state), owner)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_ID_HEADER, user.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        read(app.clone().oneshot(request).await.unwrap()).await
    }

    async fn read(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn upload(app: &Router, user: Uuid, file_name: &str, contents: &[u8]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/ats/analyses")
            .header(USER_ID_HEADER, user.to_string())
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        read(app.clone().oneshot(request).await.unwrap()).await
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app().await;
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_principal_is_unauthorized() {
        let (app, _) = app().await;
        let (status, body) = send(&app, Method::GET, "/api/v1/ats/analyses", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_score_preview() {
        let (app, owner) = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/ats/score",
            Some(owner),
            Some(json!({"text": null, "file_name": "john_resume.pdf", "file_size": 30000})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ats_score"], 70);
        assert_eq!(body["score_category"], "Good");
        assert_eq!(body["scoring_path"], "metadata");
    }

    #[tokio::test]
    async fn test_upload_share_and_unshare() {
        let (app, owner) = app().await;
        let (status, created) = upload(
            &app,
            owner,
            "resume.txt",
            b"Experience Skills Education python docker",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["result"]["scoring_path"], "text");
        let id = created["id"].as_str().unwrap().to_string();
        let token = created["share_token"].as_str().unwrap().to_string();

        let public_uri = format!("/api/v1/public/ats/{token}");
        let (status, _) = send(&app, Method::GET, &public_uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let visibility_uri = format!("/api/v1/ats/analyses/{id}/visibility");
        let (status, _) = send(
            &app,
            Method::PATCH,
            &visibility_uri,
            Some(owner),
            Some(json!({"is_public": true})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, shared) = send(&app, Method::GET, &public_uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(shared["owner_display_name"], "Grace Hopper");
        assert_eq!(shared["id"], id.as_str());
        assert!(shared.get("owner_id").is_none());
        assert!(!shared.to_string().contains(&owner.to_string()));

        send(
            &app,
            Method::PATCH,
            &visibility_uri,
            Some(owner),
            Some(json!({"is_public": false})),
        )
        .await;
        let (status, _) = send(&app, Method::GET, &public_uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreadable_upload_falls_back() {
        let (app, owner) = app().await;
        let (status, created) = upload(&app, owner, "my_cv.docx", b"PK\x03\x04binary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["result"]["scoring_path"], "metadata");
        // tiny file (−10) with "cv" in the name (+5)
        assert_eq!(created["result"]["ats_score"], 70);
    }

    #[tokio::test]
    async fn test_foreign_record_is_not_found() {
        let (app, owner) = app().await;
        let (_, created) = upload(&app, owner, "resume.txt", b"Skills: sql").await;
        let uri = format!("/api/v1/ats/analyses/{}", created["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::GET, &uri, Some(Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, stats) = send(&app, Method::GET, "/api/v1/ats/stats", Some(owner), None).await;
        assert_eq!(stats["total_resumes_analyzed"], 0);
    }

    #[tokio::test]
    async fn test_analytics_and_insights_routes() {
        let (app, owner) = app().await;
        upload(&app, owner, "resume.txt", b"Skills: sql").await;
        upload(&app, owner, "resume.txt", b"Experience Skills Education python docker").await;

        let (status, analytics) =
            send(&app, Method::GET, "/api/v1/ats/analytics", Some(owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(analytics["total_analyses"], 2);
        assert_eq!(analytics["trend_data"].as_array().unwrap().len(), 2);

        let (status, feed) = send(&app, Method::GET, "/api/v1/ats/insights", Some(owner), None).await;
        assert_eq!(status, StatusCode::OK);
        let insights = feed["insights"].as_array().unwrap();
        assert_eq!(insights.len(), 2);
        assert!(insights[0]["comparison"]
            .as_str()
            .unwrap()
            .starts_with("Score improved"));
        assert!(insights[1]["comparison"].is_null());
    }
}
