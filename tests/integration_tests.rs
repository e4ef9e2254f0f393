//! HTTP-level tests against the full router, backed by the in-memory
//! repository, a temporary upload directory and a scripted summarizer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::Multipart,
    http::{header, HeaderName, HeaderValue, StatusCode},
    routing::post,
    Router,
};
use axum_test::TestServer;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::TempDir;

use pdf_summary_api::{
    config::Config,
    create_router,
    db::{MemoryRepository, Repository},
    error::{AppError, AppResult},
    models::{Language, SummaryStyle},
    services::{HttpSummarizer, SummarizeJob, Summarizer, SummaryPayload},
    validation::ListParams,
    AppState,
};

const BOUNDARY: &str = "X-PDF-SUMMARY-TEST-BOUNDARY";

enum Script {
    Succeed(Value),
    Fail { status: u16, body: String },
}

struct FakeSummarizer {
    script: Script,
    calls: Mutex<Vec<SummarizeJob>>,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, job: SummarizeJob) -> AppResult<SummaryPayload> {
        self.calls.lock().push(job);
        match &self.script {
            Script::Succeed(raw) => SummaryPayload::from_value(raw.clone()),
            Script::Fail { status, body } => Err(AppError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

struct TestApp {
    server: TestServer,
    repo: Arc<MemoryRepository>,
    summarizer: Arc<FakeSummarizer>,
    uploads: TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::with_script(Script::Succeed(summary_response()))
    }

    fn with_script(script: Script) -> Self {
        let uploads = TempDir::new().unwrap();
        let config = Config {
            upload_dir: uploads.path().to_path_buf(),
            ..Config::default()
        };
        let repo = Arc::new(MemoryRepository::new());
        let summarizer = Arc::new(FakeSummarizer {
            script,
            calls: Mutex::new(Vec::new()),
        });
        let state = AppState::new(config, repo.clone(), summarizer.clone());
        let server = TestServer::new(create_router(state)).unwrap();

        Self {
            server,
            repo,
            summarizer,
            uploads,
        }
    }

    fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn upload(
        &self,
        file_name: &str,
        content: &[u8],
        title: Option<&str>,
    ) -> axum_test::TestResponse {
        self.server
            .post("/pdf/upload")
            .content_type(&format!("multipart/form-data; boundary={}", BOUNDARY))
            .bytes(multipart_body(file_name, content, title).into())
            .await
    }

    async fn create_pdf(&self, title: &str, file_size: i64) -> Value {
        let response = self
            .server
            .post("/pdf")
            .json(&json!({
                "filename": format!("{}.pdf", title.to_lowercase().replace(' ', "-")),
                "file_size": file_size,
                "title": title,
                "page_count": 3
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }
}

fn multipart_body(file_name: &str, content: &[u8], title: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");

    if let Some(title) = title {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"title\"\r\n\r\n");
        body.extend_from_slice(title.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn summary_response() -> Value {
    json!({
        "style": "detailed",
        "language": "indonesian",
        "summary": {
            "main_summary": "Dokumen ini membahas laporan tahunan.",
            "key_points": ["pendapatan naik", "biaya turun"]
        },
        "process_info": {
            "processing_time_seconds": 4.5,
            "pages_processed": 12
        }
    })
}

#[tokio::test]
async fn test_ping() {
    let app = TestApp::new();

    let response = app.server.get("/ping").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "message": "pong" }));
}

#[tokio::test]
async fn test_upload_without_title_uses_file_stem() {
    let app = TestApp::new();

    let response = app.upload("report.pdf", b"0123456789", None).await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["title"], "report");
    assert_eq!(body["file_size"], 10);
    assert_eq!(body["page_count"], 0);

    let stored = body["filename"].as_str().unwrap().to_string();
    assert_ne!(stored, "report.pdf");
    assert!(stored.ends_with(".pdf"));
    assert_eq!(app.stored_files(), vec![stored]);
}

#[tokio::test]
async fn test_upload_with_title() {
    let app = TestApp::new();

    let response = app
        .upload("scan_001.PDF", b"%PDF-1.4 not really", Some("  Quarterly Results  "))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["title"], "Quarterly Results");
}

#[tokio::test]
async fn test_upload_long_filename_title_is_truncated() {
    let app = TestApp::new();
    let file_name = format!("{}.pdf", "q".repeat(300));

    let response = app.upload(&file_name, b"0123456789", None).await;
    response.assert_status(StatusCode::CREATED);

    let title = response.json::<Value>()["title"].as_str().unwrap().to_string();
    assert_eq!(title, "q".repeat(255));
}

#[tokio::test]
async fn test_upload_rejects_non_pdf_before_any_write() {
    let app = TestApp::new();

    let response = app.upload("notes.txt", b"plain text", None).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INVALID_FILE");

    let page = app.repo.list_pdfs(&ListParams::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_empty_file() {
    let app = TestApp::new();

    let response = app.upload("empty.pdf", b"", None).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_upload_requires_file_field() {
    let app = TestApp::new();

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nOnly a title\r\n--{b}--\r\n",
        b = BOUNDARY
    );
    let response = app
        .server
        .post("/pdf/upload")
        .content_type(&format!("multipart/form-data; boundary={}", BOUNDARY))
        .bytes(body.into_bytes().into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "MISSING_FILE");
}

#[tokio::test]
async fn test_create_and_get_pdf() {
    let app = TestApp::new();

    let created = app.create_pdf("Annual Report", 2048).await;
    assert_eq!(created["title"], "Annual Report");
    assert_eq!(created["page_count"], 3);

    let id = created["id"].as_i64().unwrap();
    let response = app.server.get(&format!("/pdf/{}", id)).await;
    response.assert_status_ok();

    let detail: Value = response.json();
    assert_eq!(detail["id"], id);
    assert_eq!(detail["file_size"], 2048);
    assert_eq!(detail["summaries"], json!([]));
}

#[tokio::test]
async fn test_create_pdf_validation() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/pdf")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "VALIDATION_ERROR");

    let response = app
        .server
        .post("/pdf")
        .json(&json!({ "filename": "a.pdf", "file_size": 10, "title": "   ", "page_count": 1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/pdf")
        .json(&json!({ "filename": "a.pdf", "file_size": 0, "title": "A", "page_count": 1 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_pdf_not_found_and_bad_id() {
    let app = TestApp::new();

    let response = app.server.get("/pdf/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "PDF not found");

    let response = app.server.get("/pdf/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_pdfs_normalizes_pagination() {
    let app = TestApp::new();
    for i in 0..15 {
        app.create_pdf(&format!("Document {:02}", i), 100 + i).await;
    }

    let response = app
        .server
        .get("/pdf")
        .add_query_param("page", "0")
        .add_query_param("itemsperpage", "500")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["itemsPerPage"], 10);
    assert_eq!(body["totalItems"], 15);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);

    let response = app
        .server
        .get("/pdf")
        .add_query_param("page", "2")
        .add_query_param("itemsperpage", "10")
        .await;
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_pdfs_sorting() {
    let app = TestApp::new();
    for (title, size) in [("Bravo", 30), ("Alpha", 10), ("Charlie", 20)] {
        app.create_pdf(title, size).await;
    }

    let titles = |body: Value| -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect()
    };

    let response = app
        .server
        .get("/pdf")
        .add_query_param("sort", "file_size")
        .add_query_param("order", "asc")
        .await;
    assert_eq!(titles(response.json()), vec!["Alpha", "Charlie", "Bravo"]);

    // Unknown field and order fall back to created_at desc (newest first).
    let response = app
        .server
        .get("/pdf")
        .add_query_param("sort", "secret_column")
        .add_query_param("order", "sideways")
        .await;
    response.assert_status_ok();
    assert_eq!(titles(response.json()), vec!["Charlie", "Alpha", "Bravo"]);
}

#[tokio::test]
async fn test_list_pdfs_search() {
    let app = TestApp::new();
    app.create_pdf("Annual Report", 10).await;
    app.create_pdf("Budget Plan", 10).await;
    app.create_pdf("report draft", 10).await;

    let response = app.server.get("/pdf").add_query_param("search", "REPORT").await;
    let body: Value = response.json();
    assert_eq!(body["totalItems"], 2);

    let response = app
        .server
        .get("/pdf")
        .add_query_param("search", "bud'get;")
        .await;
    let body: Value = response.json();
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["data"][0]["title"], "Budget Plan");
}

#[tokio::test]
async fn test_list_pdfs_search_treats_wildcards_literally() {
    let app = TestApp::new();
    app.create_pdf("axb notes", 10).await;
    app.create_pdf("a_b notes", 10).await;
    app.create_pdf("50% off", 10).await;
    app.create_pdf("500 items", 10).await;

    let body: Value = app
        .server
        .get("/pdf")
        .add_query_param("search", "a_b")
        .await
        .json();
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["data"][0]["title"], "a_b notes");

    let body: Value = app
        .server
        .get("/pdf")
        .add_query_param("search", "50%")
        .await
        .json();
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["data"][0]["title"], "50% off");
}

#[tokio::test]
async fn test_summarize_persists_and_relays_response() {
    let app = TestApp::new();
    let uploaded: Value = app.upload("annual.pdf", b"fake pdf bytes", None).await.json();
    let id = uploaded["id"].as_i64().unwrap();

    let response = app
        .server
        .post(&format!("/pdf/{}/summarize", id))
        .json(&json!({ "style": "detailed", "language": "indonesian" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), summary_response());

    {
        let calls = app.summarizer.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].content, b"fake pdf bytes".to_vec());
        assert_eq!(calls[0].style, SummaryStyle::Detailed);
        assert_eq!(calls[0].language, Language::Indonesian);
    }

    let detail: Value = app.server.get(&format!("/pdf/{}", id)).await.json();
    let summaries = detail["summaries"].as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["content"], "Dokumen ini membahas laporan tahunan.");
    assert_eq!(summaries[0]["style"], "detailed");
    assert_eq!(summaries[0]["language"], "indonesian");
    assert_eq!(summaries[0]["summary_time"], 4.5);

    let list: Value = app.server.get("/summaries").await.json();
    assert_eq!(list["totalItems"], 1);
    assert_eq!(list["data"][0]["pdf_id"], id);
}

#[tokio::test]
async fn test_summarize_defaults_style_and_language() {
    let app = TestApp::new();
    let uploaded: Value = app.upload("doc.pdf", b"bytes", None).await.json();
    let id = uploaded["id"].as_i64().unwrap();

    app.server
        .post(&format!("/pdf/{}/summarize", id))
        .json(&json!({}))
        .await
        .assert_status_ok();

    let calls = app.summarizer.calls.lock();
    assert_eq!(calls[0].style, SummaryStyle::General);
    assert_eq!(calls[0].language, Language::English);
}

#[tokio::test]
async fn test_summarize_relays_service_errors() {
    let app = TestApp::with_script(Script::Fail {
        status: 503,
        body: "model is loading".to_string(),
    });
    let uploaded: Value = app.upload("doc.pdf", b"bytes", None).await.json();
    let id = uploaded["id"].as_i64().unwrap();

    let response = app
        .server
        .post(&format!("/pdf/{}/summarize", id))
        .json(&json!({ "style": "short", "language": "english" }))
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = response.json();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("model is loading"));
    assert_eq!(app.repo.summary_count().await, 0);
}

#[tokio::test]
async fn test_summarize_rejects_unknown_pdf_and_bad_options() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/pdf/77/summarize")
        .json(&json!({ "style": "short", "language": "english" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let uploaded: Value = app.upload("doc.pdf", b"bytes", None).await.json();
    let id = uploaded["id"].as_i64().unwrap();
    let response = app
        .server
        .post(&format!("/pdf/{}/summarize", id))
        .json(&json!({ "style": "epic", "language": "english" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.summarizer.calls.lock().is_empty());
}

#[tokio::test]
async fn test_summarize_fails_when_stored_file_is_missing() {
    let app = TestApp::new();
    let created = app.create_pdf("Registered Only", 10).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .server
        .post(&format!("/pdf/{}/summarize", id))
        .json(&json!({ "style": "short", "language": "english" }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.summarizer.calls.lock().is_empty());
}

#[tokio::test]
async fn test_delete_pdf_removes_summaries_and_file() {
    let app = TestApp::new();
    let uploaded: Value = app.upload("doc.pdf", b"bytes", None).await.json();
    let id = uploaded["id"].as_i64().unwrap();

    for _ in 0..2 {
        app.server
            .post(&format!("/pdf/{}/summarize", id))
            .json(&json!({ "style": "short", "language": "english" }))
            .await
            .assert_status_ok();
    }
    assert_eq!(app.repo.summary_count().await, 2);
    assert_eq!(app.stored_files().len(), 1);

    let response = app.server.delete(&format!("/pdf/{}", id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "PDF deleted successfully");

    assert_eq!(app.repo.summary_count().await, 0);
    assert!(app.stored_files().is_empty());
    app.server
        .get(&format!("/pdf/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete(&format!("/pdf/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_pdf_tolerates_missing_file() {
    let app = TestApp::new();
    let created = app.create_pdf("Metadata Only", 10).await;
    let id = created["id"].as_i64().unwrap();

    app.server
        .delete(&format!("/pdf/{}", id))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_summary_get_and_delete() {
    let app = TestApp::new();
    let uploaded: Value = app.upload("doc.pdf", b"bytes", None).await.json();
    let pdf_id = uploaded["id"].as_i64().unwrap();
    app.server
        .post(&format!("/pdf/{}/summarize", pdf_id))
        .json(&json!({}))
        .await
        .assert_status_ok();

    let list: Value = app.server.get("/summaries").await.json();
    let summary_id = list["data"][0]["id"].as_i64().unwrap();

    let response = app.server.get(&format!("/summaries/{}", summary_id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["pdf_id"], pdf_id);

    let response = app.server.delete(&format!("/summaries/{}", summary_id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "Summary deleted successfully");

    app.server
        .get(&format!("/summaries/{}", summary_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .delete(&format!("/summaries/{}", summary_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // The parent PDF is untouched.
    app.server
        .get(&format!("/pdf/{}", pdf_id))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_list_summaries_search() {
    let app = TestApp::new();
    let uploaded: Value = app.upload("doc.pdf", b"bytes", None).await.json();
    let pdf_id = uploaded["id"].as_i64().unwrap();
    app.server
        .post(&format!("/pdf/{}/summarize", pdf_id))
        .json(&json!({}))
        .await
        .assert_status_ok();

    let hit: Value = app
        .server
        .get("/summaries")
        .add_query_param("search", "LAPORAN")
        .await
        .json();
    assert_eq!(hit["totalItems"], 1);

    let miss: Value = app
        .server
        .get("/summaries")
        .add_query_param("search", "quarterly")
        .await
        .json();
    assert_eq!(miss["totalItems"], 0);
    assert_eq!(miss["totalPages"], 0);
}

#[tokio::test]
async fn test_rate_limit_rejects_101st_request() {
    let app = TestApp::new();

    for i in 1..=100 {
        let response = app.server.get("/ping").await;
        assert_eq!(response.status_code(), StatusCode::OK, "request {} should succeed", i);
    }

    let response = app.server.get("/ping").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json::<Value>()["error"]["code"], "RATE_LIMIT_EXCEEDED");

    // Health checks bypass the limiter and report the rejection.
    let health = app.server.get("/health").await;
    health.assert_status_ok();
    let body: Value = health.json();
    assert_eq!(body["rate_limiting"]["rejected_requests"], 1);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"], true);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = TestApp::new();

    let response = app.server.get("/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["status"], 404);
    assert!(body["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_error_request_id_matches_response_header() {
    let app = TestApp::new();

    for path in ["/pdf/999", "/pdf/abc", "/nope"] {
        let response = app.server.get(path).await;
        let header = response.header("x-request-id");
        let body: Value = response.json();
        assert_eq!(
            body["error"]["request_id"].as_str().unwrap(),
            header.to_str().unwrap(),
            "request id mismatch for {}",
            path
        );
    }
}

#[tokio::test]
async fn test_cors_and_request_id_headers() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/ping")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://localhost:3000"),
        )
        .await;
    response.assert_status_ok();

    assert_eq!(response.header("access-control-allow-origin"), "*");
    assert!(!response.header("x-request-id").is_empty());
}

type ReceivedFields = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

/// Serves `POST /summarize` on an ephemeral port, answering every request
/// with `status` and `body` and recording the multipart fields it got.
async fn spawn_summary_service(status: StatusCode, body: String) -> (String, ReceivedFields) {
    let received: ReceivedFields = Arc::new(Mutex::new(Vec::new()));
    let log = received.clone();

    let service = Router::new().route(
        "/summarize",
        post(move |mut multipart: Multipart| {
            let log = log.clone();
            let body = body.clone();
            async move {
                while let Ok(Some(field)) = multipart.next_field().await {
                    let name = field.name().unwrap_or("").to_string();
                    let data = field.bytes().await.unwrap_or_default();
                    log.lock().push((name, data.to_vec()));
                }
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, service).await.unwrap();
    });

    (format!("http://{}/summarize", addr), received)
}

fn summary_job() -> SummarizeJob {
    SummarizeJob {
        file_name: "stored.pdf".to_string(),
        content: b"%PDF-1.4 fake".to_vec(),
        style: SummaryStyle::Detailed,
        language: Language::Indonesian,
    }
}

#[tokio::test]
async fn test_http_summarizer_sends_form_and_keeps_raw_response() {
    let (url, received) =
        spawn_summary_service(StatusCode::OK, summary_response().to_string()).await;
    let summarizer = HttpSummarizer::new(url, Some(Duration::from_secs(5))).unwrap();

    let payload = summarizer.summarize(summary_job()).await.unwrap();
    assert_eq!(payload.raw, summary_response());
    assert_eq!(payload.parsed.summary.main_summary, "Dokumen ini membahas laporan tahunan.");
    assert_eq!(payload.parsed.process_info.processing_time_seconds, 4.5);

    let fields = received.lock().clone();
    let names: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["file", "style", "language"]);
    assert_eq!(fields[0].1, b"%PDF-1.4 fake".to_vec());
    assert_eq!(fields[1].1, b"detailed".to_vec());
    assert_eq!(fields[2].1, b"indonesian".to_vec());
}

#[tokio::test]
async fn test_http_summarizer_relays_error_status_and_body() {
    let (url, _) = spawn_summary_service(
        StatusCode::SERVICE_UNAVAILABLE,
        "model is loading".to_string(),
    )
    .await;
    let summarizer = HttpSummarizer::new(url, None).unwrap();

    let err = summarizer.summarize(summary_job()).await.unwrap_err();
    assert_eq!(err.error_code(), "SUMMARIZER_ERROR");
    assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    match err {
        AppError::Upstream { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "model is loading");
        }
        other => panic!("Expected Upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_summarizer_rejects_unexpected_bodies() {
    let (url, _) = spawn_summary_service(StatusCode::OK, "not json".to_string()).await;
    let summarizer = HttpSummarizer::new(url, None).unwrap();
    let err = summarizer.summarize(summary_job()).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let (url, _) =
        spawn_summary_service(StatusCode::OK, json!({ "summary": "flat" }).to_string()).await;
    let summarizer = HttpSummarizer::new(url, None).unwrap();
    let err = summarizer.summarize(summary_job()).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
