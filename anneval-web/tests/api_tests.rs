//! Integration tests for anneval-web API endpoints
//!
//! Covers evaluator identity resolution, session lifecycle, submission
//! upsert semantics, aggregate statistics, and audio upload validation.
//! Each test runs against a fresh temp database and audio directory.

use anneval_web::{build_router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test fixture: temp root folder with database and audio dir
struct TestApp {
    app: axum::Router,
    pool: sqlx::SqlitePool,
    _root: TempDir,
}

async fn setup_app() -> TestApp {
    let root = TempDir::new().expect("Should create temp dir");
    let audio_dir = root.path().join("audio-files");
    std::fs::create_dir_all(&audio_dir).unwrap();

    let pool = anneval_common::db::init::init_database(&root.path().join("anneval.db"))
        .await
        .expect("Should initialize test database");

    let state = AppState::new(pool.clone(), audio_dir);
    TestApp {
        app: build_router(state),
        pool,
        _root: root,
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Build a multipart upload request for the audio endpoint
fn upload_request(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    const BOUNDARY: &str = "anneval-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/audio")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Resolve an evaluator, returning its id
async fn resolve(app: &axum::Router, name: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/evaluators/resolve",
            json!({ "name": name }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    body["id"].as_str().unwrap().to_string()
}

/// Create a session, returning its id
async fn create_session(app: &axum::Router, title: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/sessions",
            json!({ "title": title, "audio_url": "/audio/test.mp3" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    body["id"].as_str().unwrap().to_string()
}

/// Submit an evaluation with the given scores
async fn submit(
    app: &axum::Router,
    session_id: &str,
    evaluator_id: &str,
    language: &str,
    scores: Value,
) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/evaluations",
            json!({
                "session_id": session_id,
                "evaluator_id": evaluator_id,
                "language": language,
                "scores": scores,
            }),
        ))
        .await
        .unwrap();
    let status = response.status();
    let body = extract_json(response.into_body()).await;
    (status, body)
}

// =============================================================================
// Health and rubric endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let test = setup_app().await;

    let response = test.app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "anneval-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_rubrics_have_both_languages_totalling_100() {
    let test = setup_app().await;

    let response = test.app.oneshot(get_request("/api/rubrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    for language in ["korean", "english"] {
        let categories = body[language]["categories"].as_array().unwrap();
        assert!(!categories.is_empty());

        let total: f64 = categories
            .iter()
            .flat_map(|c| c["items"].as_array().unwrap().iter())
            .map(|i| i["max_score"].as_f64().unwrap())
            .sum();
        assert_eq!(total, 100.0, "{} rubric max total", language);
    }
}

// =============================================================================
// Evaluator identity resolution
// =============================================================================

#[tokio::test]
async fn test_resolve_evaluator_is_idempotent_per_name() {
    let test = setup_app().await;

    let first = resolve(&test.app, "홍길동").await;
    let second = resolve(&test.app, "홍길동").await;
    assert_eq!(first, second, "Same name must resolve to the same id");

    let other = resolve(&test.app, "김철수").await;
    assert_ne!(first, other);

    // Exactly one row per distinct name (plus the seeded admin)
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluators WHERE is_admin = 0")
        .fetch_one(&test.pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_resolve_evaluator_synthesizes_unique_emails() {
    let test = setup_app().await;

    resolve(&test.app, "평가자A").await;
    resolve(&test.app, "평가자B").await;

    let emails: Vec<String> =
        sqlx::query_scalar("SELECT email FROM evaluators WHERE is_admin = 0")
            .fetch_all(&test.pool)
            .await
            .unwrap();

    assert_eq!(emails.len(), 2);
    assert_ne!(emails[0], emails[1]);
    for email in &emails {
        assert!(email.starts_with("guest-"), "Synthesized address: {}", email);
    }
}

#[tokio::test]
async fn test_resolve_evaluator_rejects_empty_name() {
    let test = setup_app().await;

    let response = test
        .app
        .oneshot(json_request(
            "POST",
            "/api/evaluators/resolve",
            json!({ "name": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn test_create_and_get_session() {
    let test = setup_app().await;

    let session_id = create_session(&test.app, "2026년 8월 기내방송 평가").await;

    let response = test
        .app
        .clone()
        .oneshot(get_request(&format!("/api/sessions/{}", session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["title"], "2026년 8월 기내방송 평가");
    assert_eq!(body["audio_url"], "/audio/test.mp3");
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn test_create_session_requires_title_and_audio() {
    let test = setup_app().await;

    for body in [
        json!({ "title": "", "audio_url": "/audio/a.mp3" }),
        json!({ "title": "Untitled", "audio_url": "" }),
    ] {
        let response = test
            .app
            .clone()
            .oneshot(json_request("POST", "/api/sessions", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // Nothing persisted
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluation_sessions")
        .fetch_one(&test.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_get_missing_session_is_404() {
    let test = setup_app().await;

    let response = test
        .app
        .oneshot(get_request(
            "/api/sessions/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_session_flips_active_flag() {
    let test = setup_app().await;
    let session_id = create_session(&test.app, "Toggle test").await;

    let response = test
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/sessions/{}/toggle", session_id),
            json!({ "is_active": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["is_active"], false);

    let response = test
        .app
        .clone()
        .oneshot(get_request(&format!("/api/sessions/{}", session_id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["is_active"], false);
}

#[tokio::test]
async fn test_sessions_list_newest_first() {
    let test = setup_app().await;
    create_session(&test.app, "First").await;
    create_session(&test.app, "Second").await;

    let response = test.app.oneshot(get_request("/api/sessions")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    let sessions = body.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
}

// =============================================================================
// Evaluation submission (upsert semantics)
// =============================================================================

#[tokio::test]
async fn test_submit_computes_total_server_side() {
    let test = setup_app().await;
    let session_id = create_session(&test.app, "Scoring").await;
    let evaluator_id = resolve(&test.app, "홍길동").await;

    // Partial scores: missing items contribute 0
    let (status, body) = submit(
        &test.app,
        &session_id,
        &evaluator_id,
        "korean",
        json!({ "발음": { "명료성": 8.0 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_score"], 8.0);
}

#[tokio::test]
async fn test_resubmission_overwrites_not_duplicates() {
    let test = setup_app().await;
    let session_id = create_session(&test.app, "Upsert").await;
    let evaluator_id = resolve(&test.app, "홍길동").await;

    let (status, _) = submit(
        &test.app,
        &session_id,
        &evaluator_id,
        "korean",
        json!({ "발음": { "명료성": 5.0, "속도": 5.0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = submit(
        &test.app,
        &session_id,
        &evaluator_id,
        "korean",
        json!({ "발음": { "명료성": 9.0, "속도": 8.5 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_score"], 17.5);

    // Exactly one stored row, holding the second submission's total
    let rows: Vec<(i64, f64)> =
        sqlx::query_as("SELECT COUNT(*), MAX(total_score) FROM evaluations")
            .fetch_all(&test.pool)
            .await
            .unwrap();
    assert_eq!(rows[0].0, 1, "Resubmission must not create a second row");
    assert_eq!(rows[0].1, 17.5);
}

#[tokio::test]
async fn test_same_evaluator_different_languages_are_separate_rows() {
    let test = setup_app().await;
    let session_id = create_session(&test.app, "Languages").await;
    let evaluator_id = resolve(&test.app, "홍길동").await;

    submit(&test.app, &session_id, &evaluator_id, "korean", json!({})).await;
    submit(&test.app, &session_id, &evaluator_id, "english", json!({})).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluations")
        .fetch_one(&test.pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_submit_rejects_invalid_scores() {
    let test = setup_app().await;
    let session_id = create_session(&test.app, "Validation").await;
    let evaluator_id = resolve(&test.app, "홍길동").await;

    // Over item maximum
    let (status, _) = submit(
        &test.app,
        &session_id,
        &evaluator_id,
        "korean",
        json!({ "발음": { "명료성": 10.5 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Not a half-point step
    let (status, _) = submit(
        &test.app,
        &session_id,
        &evaluator_id,
        "korean",
        json!({ "발음": { "명료성": 7.3 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Category from the other language's rubric
    let (status, _) = submit(
        &test.app,
        &session_id,
        &evaluator_id,
        "english",
        json!({ "발음": { "명료성": 5.0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM evaluations")
        .fetch_one(&test.pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "Rejected submissions must not persist");
}

#[tokio::test]
async fn test_submit_to_missing_session_is_404() {
    let test = setup_app().await;
    let evaluator_id = resolve(&test.app, "홍길동").await;

    let (status, _) = submit(
        &test.app,
        "00000000-0000-0000-0000-000000000000",
        &evaluator_id,
        "korean",
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_evaluation_list_supports_evaluator_filter() {
    let test = setup_app().await;
    let session_id = create_session(&test.app, "Filter").await;
    let first = resolve(&test.app, "홍길동").await;
    let second = resolve(&test.app, "김철수").await;

    submit(&test.app, &session_id, &first, "korean", json!({})).await;
    submit(&test.app, &session_id, &second, "korean", json!({})).await;
    submit(&test.app, &session_id, &second, "english", json!({})).await;

    let response = test
        .app
        .clone()
        .oneshot(get_request(&format!(
            "/api/sessions/{}/evaluations",
            session_id
        )))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert!(body[0]["evaluator_name"].is_string());

    // Scoped to one evaluator: the reload path re-deriving submitted tabs
    let response = test
        .app
        .clone()
        .oneshot(get_request(&format!(
            "/api/sessions/{}/evaluations?evaluator_id={}",
            session_id, second
        )))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let languages: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["language"].as_str().unwrap())
        .collect();
    assert_eq!(languages.len(), 2);
    assert!(languages.contains(&"korean"));
    assert!(languages.contains(&"english"));
}

// =============================================================================
// Aggregate statistics
// =============================================================================

#[tokio::test]
async fn test_stats_for_empty_session_are_all_zero() {
    let test = setup_app().await;
    let session_id = create_session(&test.app, "Empty").await;

    let response = test
        .app
        .oneshot(get_request(&format!("/api/sessions/{}/stats", session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    for language in ["korean", "english"] {
        assert_eq!(body[language]["overall"]["count"], 0);
        assert_eq!(body[language]["overall"]["average"], 0.0);
        assert_eq!(body[language]["overall"]["min"], 0.0);
        assert_eq!(body[language]["overall"]["max"], 0.0);
        assert!(body[language]["categories"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_stats_aggregate_totals_per_language() {
    let test = setup_app().await;
    let session_id = create_session(&test.app, "Stats").await;
    let first = resolve(&test.app, "홍길동").await;
    let second = resolve(&test.app, "김철수").await;

    // Full korean rubric scores summing to 72 and 88
    let scores_72 = json!({
        "발음": { "명료성": 7.0, "속도": 7.0 },
        "억양": { "자연스러움": 7.0, "높낮이": 7.0 },
        "전달력": { "성량": 7.0, "전달의 명확성": 7.0 },
        "표현": { "친절함": 7.0, "자신감": 7.0 },
        "전체 인상": { "전문성": 8.0, "전반적 완성도": 8.0 }
    });
    let scores_88 = json!({
        "발음": { "명료성": 9.0, "속도": 9.0 },
        "억양": { "자연스러움": 9.0, "높낮이": 9.0 },
        "전달력": { "성량": 9.0, "전달의 명확성": 9.0 },
        "표현": { "친절함": 9.0, "자신감": 9.0 },
        "전체 인상": { "전문성": 8.0, "전반적 완성도": 8.0 }
    });

    let (status, body) = submit(&test.app, &session_id, &first, "korean", scores_72).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_score"], 72.0);

    let (status, body) = submit(&test.app, &session_id, &second, "korean", scores_88).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_score"], 88.0);

    let response = test
        .app
        .oneshot(get_request(&format!("/api/sessions/{}/stats", session_id)))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;

    let korean = &body["korean"]["overall"];
    assert_eq!(korean["count"], 2);
    assert_eq!(korean["average"], 80.0);
    assert_eq!(korean["min"], 72.0);
    assert_eq!(korean["max"], 88.0);

    // English untouched
    assert_eq!(body["english"]["overall"]["count"], 0);

    // Per-category breakdown covers every scored category
    let categories = body["korean"]["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 5);
    let pronunciation = categories
        .iter()
        .find(|c| c["category"] == "발음")
        .unwrap();
    assert_eq!(pronunciation["average"], 16.0);
    assert_eq!(pronunciation["min"], 14.0);
    assert_eq!(pronunciation["max"], 18.0);
}

// =============================================================================
// Audio upload validation
// =============================================================================

/// Minimal RIFF/WAVE header so content sniffing sees audio
fn fake_wav(len: usize) -> Vec<u8> {
    let mut data = b"RIFF".to_vec();
    data.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
    data.extend_from_slice(b"WAVEfmt ");
    data.resize(len.max(data.len()), 0);
    data
}

#[tokio::test]
async fn test_upload_and_delete_audio_file() {
    let test = setup_app().await;

    let response = test
        .app
        .clone()
        .oneshot(upload_request("announcement.wav", "audio/wav", &fake_wav(256)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let stored_name = body["name"].as_str().unwrap().to_string();
    assert!(stored_name.ends_with(".wav"));
    assert_eq!(body["url"], format!("/audio/{}", stored_name));

    // Listed afterwards
    let response = test.app.clone().oneshot(get_request("/api/audio")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Delete, then a second delete is 404
    let delete_request = |name: &str| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/audio/{}", name))
            .body(Body::empty())
            .unwrap()
    };

    let response = test
        .app
        .clone()
        .oneshot(delete_request(&stored_name))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = test
        .app
        .clone()
        .oneshot(delete_request(&stored_name))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejects_non_audio_content() {
    let test = setup_app().await;

    let response = test
        .app
        .clone()
        .oneshot(upload_request("notes.txt", "text/plain", b"not audio"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing written
    let response = test.app.oneshot(get_request("/api/audio")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    let test = setup_app().await;

    // 60 MB exceeds the 50 MB cap; rejected before any write
    let oversized = fake_wav(60 * 1024 * 1024);
    let response = test
        .app
        .clone()
        .oneshot(upload_request("big.wav", "audio/wav", &oversized))
        .await
        .unwrap();
    assert!(
        response.status().is_client_error(),
        "Oversized upload accepted: {}",
        response.status()
    );

    let response = test.app.oneshot(get_request("/api/audio")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());
}
