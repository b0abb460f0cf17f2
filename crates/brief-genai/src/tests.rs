//! End-to-end pipeline tests against an in-memory store and a fake
//! `generateContent` endpoint served by axum on a loopback port.

use std::sync::{Arc, Mutex};

use axum::{
  Router,
  body::Bytes,
  extract::State,
  http::{StatusCode, Uri},
};
use brief_core::{
  activity::{NewEvent, NewTask},
  expense::ExtractedExpense,
  file::NewFile,
  store::ActivityStore,
};
use brief_store_sqlite::SqliteStore;
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::{
  AcceptExpense, GenAiClient, GenAiConfig, SummaryPipeline,
  prompt::NO_ACTIVITY_SUMMARY,
  response::AUTH_HINT,
  wire::{GenerateContentRequest, Part},
};

// ─── Fake upstream ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Captured {
  uri:  Uri,
  body: GenerateContentRequest,
}

#[derive(Clone)]
struct Upstream {
  status:   StatusCode,
  body:     String,
  captured: Arc<Mutex<Vec<Captured>>>,
}

impl Upstream {
  fn requests(&self) -> Vec<Captured> { self.captured.lock().unwrap().clone() }
}

async fn reply(
  State(upstream): State<Upstream>,
  uri: Uri,
  body: Bytes,
) -> (StatusCode, String) {
  let parsed: GenerateContentRequest = serde_json::from_slice(&body).unwrap();
  upstream
    .captured
    .lock()
    .unwrap()
    .push(Captured { uri, body: parsed });
  (upstream.status, upstream.body.clone())
}

/// Serve `body` with `status` for every request; returns the base URL.
async fn fake_upstream(status: StatusCode, body: impl Into<String>) -> (String, Upstream) {
  let upstream = Upstream {
    status,
    body: body.into(),
    captured: Arc::new(Mutex::new(Vec::new())),
  };
  let app = Router::new().fallback(reply).with_state(upstream.clone());
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (format!("http://{addr}"), upstream)
}

fn gemini_text(text: &str) -> String {
  json!({"candidates":[{"content":{"parts":[{"text": text}],"role":"model"}}]}).to_string()
}

async fn pipeline(base_url: &str) -> SummaryPipeline<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let config = GenAiConfig {
    base_url:     base_url.to_owned(),
    model:        "test-model".into(),
    api_key:      "test-key".into(),
    timeout_secs: Some(5),
  };
  SummaryPipeline::new(Arc::new(store), GenAiClient::new(config).unwrap())
}

async fn seed_activity(p: &SummaryPipeline<SqliteStore>) -> Uuid {
  let store = p.store();
  let account = store.add_account("Acme Corp".into()).await.unwrap();
  let t0 = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
  for i in 0..3 {
    store
      .record_task(NewTask {
        account_id:  account.account_id,
        subject:     Some(format!("Task {i}")),
        description: Some("Call back about renewal".into()),
        status:      "Open".into(),
        created_at:  Some(t0 + Duration::hours(i)),
      })
      .await
      .unwrap();
  }
  for i in 0..2 {
    store
      .record_event(NewEvent {
        account_id:  account.account_id,
        subject:     Some(format!("Meeting {i}")),
        description: None,
        created_at:  Some(t0 + Duration::minutes(30 + 60 * i)),
      })
      .await
      .unwrap();
  }
  account.account_id
}

fn prompt_text(req: &GenerateContentRequest) -> &str {
  match &req.contents[0].parts[0] {
    Part::Text { text } => text,
    other => panic!("expected text part, got {other:?}"),
  }
}

fn receipt() -> NewFile {
  NewFile::from_file_name("receipt.png", "image/png", vec![0x89u8, 0x50, 0x4e, 0x47])
}

// ─── Summarize ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_summary() {
  let (url, upstream) = fake_upstream(StatusCode::OK, gemini_text("Hello")).await;
  let p = pipeline(&url).await;
  let account_id = seed_activity(&p).await;

  let resp = p.summarize(Some(account_id), None).await;
  assert!(resp.is_success, "{resp:?}");
  assert_eq!(resp.summary.as_deref(), Some("Hello"));
  assert_eq!(resp.error_message, None);
  assert_eq!(resp.status_code, Some(200));

  let requests = upstream.requests();
  assert_eq!(requests.len(), 1);
  assert_eq!(requests[0].uri.path(), "/v1/models/test-model:generateContent");
  assert_eq!(requests[0].uri.query(), Some("key=test-key"));

  let prompt = prompt_text(&requests[0].body);
  assert_eq!(prompt.matches("Type: ").count(), 5);
  // Newest first: Task 2 (11:00) precedes Meeting 1 (10:30).
  let task2 = prompt.find("Subject: Task 2").unwrap();
  let meeting1 = prompt.find("Subject: Meeting 1").unwrap();
  assert!(task2 < meeting1);
}

#[tokio::test]
async fn unauthorized_upstream() {
  let (url, _) = fake_upstream(
    StatusCode::UNAUTHORIZED,
    r#"{"error":{"code":401,"message":"API key not valid"}}"#,
  )
  .await;
  let p = pipeline(&url).await;
  let account_id = seed_activity(&p).await;

  let resp = p.summarize(Some(account_id), None).await;
  assert!(!resp.is_success);
  assert_eq!(resp.status_code, Some(401));
  let msg = resp.error_message.unwrap();
  assert!(msg.starts_with(AUTH_HINT), "{msg}");
  assert!(msg.contains("API key not valid"));
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
  let (url, _) = fake_upstream(StatusCode::SERVICE_UNAVAILABLE, "overloaded").await;
  let p = pipeline(&url).await;
  let account_id = seed_activity(&p).await;

  let resp = p.summarize(Some(account_id), None).await;
  assert!(!resp.is_success);
  assert_eq!(resp.status_code, Some(503));
  assert_eq!(
    resp.error_message.as_deref(),
    Some("Gemini API error: 503 Service Unavailable - overloaded")
  );
}

#[tokio::test]
async fn missing_candidates_is_a_failure_not_a_panic() {
  let (url, _) = fake_upstream(StatusCode::OK, r#"{"usageMetadata":{}}"#).await;
  let p = pipeline(&url).await;
  let account_id = seed_activity(&p).await;

  let resp = p.summarize(Some(account_id), None).await;
  assert!(!resp.is_success);
  assert!(resp.error_message.unwrap().starts_with("Invalid response format"));
}

#[tokio::test]
async fn no_activity_skips_the_endpoint() {
  let (url, upstream) = fake_upstream(StatusCode::OK, gemini_text("unused")).await;
  let p = pipeline(&url).await;
  let account = p.store().add_account("Quiet Co".into()).await.unwrap();

  let resp = p.summarize(Some(account.account_id), None).await;
  assert!(resp.is_success);
  assert_eq!(resp.summary.as_deref(), Some(NO_ACTIVITY_SUMMARY));
  assert_eq!(resp.status_code, None);
  assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn missing_account_id_is_rejected() {
  let (url, upstream) = fake_upstream(StatusCode::OK, gemini_text("unused")).await;
  let p = pipeline(&url).await;

  let resp = p.summarize(None, None).await;
  assert!(!resp.is_success);
  assert_eq!(resp.error_message.as_deref(), Some("Account ID is required"));
  assert_eq!(resp.status_code, None);
  assert!(upstream.requests().is_empty());
}

#[tokio::test]
async fn zero_limit_is_rejected() {
  let (url, _) = fake_upstream(StatusCode::OK, gemini_text("unused")).await;
  let p = pipeline(&url).await;
  let account_id = seed_activity(&p).await;

  let resp = p.summarize(Some(account_id), Some(0)).await;
  assert!(!resp.is_success);
  assert!(resp.error_message.unwrap().contains("limit"));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
  // Bind and drop to get a port nothing listens on.
  let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
  let p = pipeline(&format!("http://{addr}")).await;
  let account_id = seed_activity(&p).await;

  let resp = p.summarize(Some(account_id), None).await;
  assert!(!resp.is_success);
  assert_eq!(resp.status_code, None);
  let msg = resp.error_message.unwrap();
  assert!(msg.starts_with("Error generating summary:"), "{msg}");
  assert!(!msg.contains("test-key"), "API key leaked: {msg}");
}

// ─── Extract ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fenced_extraction_response() {
  let text = "```json\n{\"vendorName\":\"Acme\",\"price\":\"10.00\",\"expenseDate\":\"2024-01-01\",\"expenseDetail\":\"Coffee\"}\n```";
  let (url, upstream) = fake_upstream(StatusCode::OK, gemini_text(text)).await;
  let p = pipeline(&url).await;
  let file = p.store().store_file(receipt()).await.unwrap();

  let resp = p.extract(file.file_version_id).await;
  assert!(resp.is_success, "{resp:?}");
  assert_eq!(
    resp.fields,
    Some(ExtractedExpense {
      vendor_name:    "Acme".into(),
      price:          "10.00".into(),
      expense_date:   "2024-01-01".into(),
      expense_detail: "Coffee".into(),
    })
  );

  let requests = upstream.requests();
  let parts = &requests[0].body.contents[0].parts;
  assert_eq!(parts.len(), 2);
  match &parts[1] {
    Part::InlineData { inline_data } => {
      assert_eq!(inline_data.mime_type, "image/png");
      assert_eq!(inline_data.data, "iVBORw==");
    }
    other => panic!("expected inline data, got {other:?}"),
  }
}

#[tokio::test]
async fn extraction_of_unknown_file_is_rejected() {
  let (url, upstream) = fake_upstream(StatusCode::OK, gemini_text("{}")).await;
  let p = pipeline(&url).await;

  let resp = p.extract(Uuid::new_v4()).await;
  assert!(!resp.is_success);
  assert!(resp.error_message.unwrap().contains("not found"));
  assert!(upstream.requests().is_empty());
}

// ─── Accept ──────────────────────────────────────────────────────────────────

fn accepted_fields() -> ExtractedExpense {
  ExtractedExpense {
    vendor_name:    "Acme".into(),
    price:          "10.00".into(),
    expense_date:   "2024-01-01".into(),
    expense_detail: "Coffee".into(),
  }
}

#[tokio::test]
async fn accept_creates_line_item_and_renamed_copy() {
  let (url, _) = fake_upstream(StatusCode::OK, gemini_text("unused")).await;
  let p = pipeline(&url).await;
  let file = p.store().store_file(receipt()).await.unwrap();

  let accepted = p
    .accept(AcceptExpense {
      fields:          accepted_fields(),
      account_id:      None,
      file_version_id: Some(file.file_version_id),
    })
    .await
    .unwrap();

  assert_eq!(accepted.line_item.price_cents, 1000);
  assert_eq!(accepted.line_item.file_version_id, Some(file.file_version_id));
  let copy = accepted.renamed_file.unwrap();
  assert_eq!(copy.file_name(), "Acme - 2024-01-01.png");
  assert_eq!(copy.document_id, file.document_id);
  assert!(accepted.rename_error.is_none());

  let items = p.store().list_expenses(None).await.unwrap();
  assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn accept_without_file_only_creates_line_item() {
  let (url, _) = fake_upstream(StatusCode::OK, gemini_text("unused")).await;
  let p = pipeline(&url).await;

  let accepted = p
    .accept(AcceptExpense {
      fields:          accepted_fields(),
      account_id:      None,
      file_version_id: None,
    })
    .await
    .unwrap();
  assert!(accepted.renamed_file.is_none());
  assert_eq!(accepted.line_item.vendor_name, "Acme");
}

#[tokio::test]
async fn accept_rejects_unknown_account_before_writing() {
  let (url, _) = fake_upstream(StatusCode::OK, gemini_text("unused")).await;
  let p = pipeline(&url).await;
  let missing = Uuid::new_v4();

  let err = p
    .accept(AcceptExpense {
      fields:          accepted_fields(),
      account_id:      Some(missing),
      file_version_id: None,
    })
    .await
    .unwrap_err();
  assert!(
    matches!(&err, crate::Error::Validation(msg) if msg == &format!("account {missing} not found")),
    "{err:?}"
  );
  assert!(p.store().list_expenses(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn accept_rejects_blank_fields_before_writing() {
  let (url, _) = fake_upstream(StatusCode::OK, gemini_text("unused")).await;
  let p = pipeline(&url).await;
  let mut fields = accepted_fields();
  fields.expense_detail = String::new();

  let err = p
    .accept(AcceptExpense { fields, account_id: None, file_version_id: None })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::MissingField("expenseDetail")));
  assert!(p.store().list_expenses(None).await.unwrap().is_empty());
}
