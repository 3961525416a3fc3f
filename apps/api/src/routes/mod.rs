pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/matches", post(handlers::handle_match))
        .route(
            "/api/v1/matches/insights",
            post(handlers::handle_insights),
        )
        .route("/api/v1/matches/export", post(handlers::handle_export))
        .route(
            "/api/v1/skills/extract",
            post(handlers::handle_extract_skills),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::matching::matcher::JobMatcher;

    fn make_state() -> AppState {
        let config = Config::from_lookup(|_| None).unwrap();
        AppState {
            matcher: Arc::new(JobMatcher::new(config.matcher).unwrap()),
            config,
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn match_body() -> Value {
        json!({
            "resume_text": "Data engineer with 6 years of experience in Python, SQL, Airflow and Snowflake.",
            "jobs": [
                {
                    "job_title": "Senior Data Engineer",
                    "employer_name": "Acme",
                    "job_description": "Own Airflow pipelines into Snowflake. 5+ years of Python and SQL.",
                    "job_is_remote": true,
                    "job_apply_link": "https://acme.example/apply"
                },
                {
                    "title": "Pastry Chef",
                    "employer": "Bakery",
                    "description": "Laminated doughs and croissants."
                }
            ]
        })
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let app = build_router(make_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_match_returns_ranked_results() {
        let app = build_router(make_state());
        let response = app
            .oneshot(post_json("/api/v1/matches", match_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["total_jobs"], 2);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0]["rank"], 1);
        assert_eq!(matches[0]["job"]["title"], "Senior Data Engineer");
        assert_eq!(matches[0]["breakdown"]["location"], 100.0);
    }

    #[tokio::test]
    async fn test_match_empty_resume_is_empty_list() {
        let app = build_router(make_state());
        let mut body = match_body();
        body["resume_text"] = json!("   ");
        let response = app
            .oneshot(post_json("/api/v1/matches", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert!(body["matches"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_match_rejects_out_of_range_min_score() {
        let app = build_router(make_state());
        let mut body = match_body();
        body["min_score"] = json!(150.0);
        let response = app
            .oneshot(post_json("/api/v1/matches", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_rejects_zero_top_n() {
        let app = build_router(make_state());
        let mut body = match_body();
        body["top_n"] = json!(0);
        let response = app
            .oneshot(post_json("/api/v1/matches", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_match_tolerates_malformed_job_records() {
        let app = build_router(make_state());
        let body = json!({
            "resume_text": "Python and AWS engineer",
            "jobs": [
                {
                    "job_title": "Cloud Engineer",
                    "job_description": "Python services on AWS",
                    "job_required_skills": ["Python", "AWS"]
                },
                {
                    "job_title": "X",
                    "job_required_skills": "Python, Aws",
                    "job_posted_at": ""
                },
                { "title": null, "skills": null, "description": "Python role" },
                42
            ]
        });
        let response = app
            .oneshot(post_json("/api/v1/matches", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["total_jobs"], 4);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 4);
        let comma_joined = matches
            .iter()
            .find(|m| m["job"]["title"] == "X")
            .unwrap();
        assert_eq!(comma_joined["job_skills"], json!(["AWS", "Python"]));
        let last = matches.last().unwrap();
        assert_eq!(last["score"], 0.0);
        assert_eq!(last["category_label"], "Basic Match");
    }

    #[tokio::test]
    async fn test_unreadable_body_uses_error_envelope() {
        let app = build_router(make_state());
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/matches")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"jobs": []"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_resume_text_uses_error_envelope() {
        let app = build_router(make_state());
        let response = app
            .oneshot(post_json("/api/v1/matches", json!({ "jobs": [] })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("resume_text"));
    }

    #[tokio::test]
    async fn test_insights_endpoint() {
        let app = build_router(make_state());
        let response = app
            .oneshot(post_json("/api/v1/matches/insights", match_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["insights"]["total_matches"], 2);
        assert_eq!(body["insights"]["remote_ratio"], 50.0);
        assert!(body["gap_analysis"]["strengths"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == "Python"));
    }

    #[tokio::test]
    async fn test_export_returns_csv() {
        let app = build_router(make_state());
        let response = app
            .oneshot(post_json("/api/v1/matches/export", match_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("date,company,role,score,link"));
        assert!(lines.next().unwrap().contains("Acme,Senior Data Engineer"));
    }

    #[tokio::test]
    async fn test_extract_skills_endpoint() {
        let app = build_router(make_state());
        let response = app
            .oneshot(post_json(
                "/api/v1/skills/extract",
                json!({ "text": "Kubernetes and k8s operators in Go (golang)", "top_k": 5 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["skills"], json!(["Go", "Kubernetes"]));
        assert!(body["keywords"].as_array().unwrap().len() <= 5);
    }

    #[tokio::test]
    async fn test_extract_skills_rejects_empty_text() {
        let app = build_router(make_state());
        let response = app
            .oneshot(post_json("/api/v1/skills/extract", json!({ "text": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
