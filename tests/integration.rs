use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rag_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("rag");
    path
}

fn run_rag(api_url: &str, args: &[&str]) -> (String, String, bool) {
    let binary = rag_binary();
    let output = Command::new(&binary)
        .arg("--api-url")
        .arg(api_url)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run rag binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn run_rag_with_stdin(api_url: &str, args: &[&str], input: &str) -> (String, String, bool) {
    let binary = rag_binary();
    let mut child = Command::new(&binary)
        .arg("--api-url")
        .arg(api_url)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to run rag binary at {:?}: {}", binary, e));

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

async fn mount_status(server: &MockServer, indexed: u64) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "indexed_documents": indexed,
            "embedding_model": "all-MiniLM-L6-v2",
            "llm_model": "rule-based"
        })))
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, verb: &str, endpoint: &str) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.to_string().eq_ignore_ascii_case(verb) && r.url.path() == endpoint)
        .map(|r| serde_json::from_slice(&r.body).unwrap_or(serde_json::Value::Null))
        .collect()
}

#[tokio::test]
async fn status_reports_service_stats() {
    let server = MockServer::start().await;
    mount_status(&server, 7).await;

    let (stdout, stderr, success) = run_rag(&server.uri(), &["status"]);
    assert!(success, "status failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("7 documents"));
    assert!(stdout.contains("all-MiniLM-L6-v2"));
    assert!(stdout.contains("rule-based"));
}

#[tokio::test]
async fn status_json_emits_parseable_output() {
    let server = MockServer::start().await;
    mount_status(&server, 3).await;

    let (stdout, _, success) = run_rag(&server.uri(), &["--json", "status"]);
    assert!(success);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["indexed_documents"], 3);
    assert_eq!(value["embedding_model"], "all-MiniLM-L6-v2");
}

#[test]
fn status_fails_when_service_is_unreachable() {
    // Nothing listens on port 1.
    let (_, stderr, success) = run_rag("http://127.0.0.1:1", &["status"]);
    assert!(!success);
    assert!(stderr.contains("status probe"), "stderr={}", stderr);
}

#[tokio::test]
async fn ingest_submits_the_document() {
    let server = MockServer::start().await;
    mount_status(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "total_documents": 1
        })))
        .mount(&server)
        .await;

    let (stdout, stderr, success) = run_rag(&server.uri(), &["ingest", "hello world"]);
    assert!(success, "ingest failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("indexed on service: 1"));
    assert!(stdout.contains("ok"));

    let bodies = requests_to(&server, "POST", "/ingest").await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["text"], "hello world");
}

#[tokio::test]
async fn ingest_rejects_blank_text_before_any_request() {
    let server = MockServer::start().await;
    mount_status(&server, 0).await;

    let (_, stderr, success) = run_rag(&server.uri(), &["ingest", "   "]);
    assert!(!success);
    assert!(stderr.contains("empty"), "stderr={}", stderr);
    assert!(requests_to(&server, "POST", "/ingest").await.is_empty());
}

#[tokio::test]
async fn ask_prints_answer_context_and_confidence() {
    let server = MockServer::start().await;
    mount_status(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "answer": "Paris.",
            "context": "The capital of France is Paris.",
            "confidence": 0.92
        })))
        .mount(&server)
        .await;

    let (stdout, stderr, success) =
        run_rag(&server.uri(), &["ask", "What is the capital of France?"]);
    assert!(success, "ask failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Paris."));
    assert!(stdout.contains("The capital of France is Paris."));
    assert!(stdout.contains("confidence: 0.92"));

    let bodies = requests_to(&server, "POST", "/ask").await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["question"], "What is the capital of France?");
    assert_eq!(bodies[0]["top_k"], 5);
}

#[tokio::test]
async fn ask_forwards_the_top_k_flag() {
    let server = MockServer::start().await;
    mount_status(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "answer": "yes" })),
        )
        .mount(&server)
        .await;

    let (_, _, success) = run_rag(&server.uri(), &["ask", "anything?", "--top-k", "10"]);
    assert!(success);

    let bodies = requests_to(&server, "POST", "/ask").await;
    assert_eq!(bodies[0]["top_k"], 10);
}

#[tokio::test]
async fn ask_surfaces_the_service_detail_on_failure() {
    let server = MockServer::start().await;
    mount_status(&server, 2).await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({ "detail": "boom" })),
        )
        .mount(&server)
        .await;

    let (_, stderr, success) = run_rag(&server.uri(), &["ask", "anything?"]);
    assert!(!success);
    assert!(stderr.contains("boom"), "stderr={}", stderr);
}

#[tokio::test]
async fn seed_from_file_ingests_every_line_in_order() {
    let server = MockServer::start().await;
    mount_status(&server, 0).await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "alpha fact\n\nbeta fact\ngamma fact").unwrap();

    let (stdout, stderr, success) = run_rag(
        &server.uri(),
        &["seed", "--file", file.path().to_str().unwrap()],
    );
    assert!(success, "seed failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("ingested: 3 documents"));

    let bodies = requests_to(&server, "POST", "/ingest").await;
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0]["text"], "alpha fact");
    assert_eq!(bodies[1]["text"], "beta fact");
    assert_eq!(bodies[2]["text"], "gamma fact");
}

#[tokio::test]
async fn seed_stops_at_the_first_failure() {
    let server = MockServer::start().await;
    mount_status(&server, 0).await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({ "detail": "disk full" })),
        )
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "a\nb\nc").unwrap();

    let (_, stderr, success) = run_rag(
        &server.uri(),
        &["seed", "--file", file.path().to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("disk full"), "stderr={}", stderr);
    assert_eq!(requests_to(&server, "POST", "/ingest").await.len(), 2);
}

#[tokio::test]
async fn seed_reads_examples_from_the_config_file() {
    let server = MockServer::start().await;
    mount_status(&server, 0).await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        config,
        "[api]\nbase_url = \"{}\"\n\n[examples]\npause_ms = 10\ntexts = [\"one\", \"two\"]",
        server.uri()
    )
    .unwrap();

    let binary = rag_binary();
    let output = Command::new(&binary)
        .args(["--config", config.path().to_str().unwrap(), "seed"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "seed failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let bodies = requests_to(&server, "POST", "/ingest").await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0]["text"], "one");
    assert_eq!(bodies[1]["text"], "two");
}

#[tokio::test]
async fn chat_records_both_sides_of_the_conversation() {
    let server = MockServer::start().await;
    mount_status(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "answer": "Paris.",
            "context": "The capital of France is Paris."
        })))
        .mount(&server)
        .await;

    let input = ":add The capital of France is Paris.\nWhat is the capital of France?\n:q\n";
    let (stdout, stderr, success) = run_rag_with_stdin(&server.uri(), &["chat"], input);
    assert!(success, "chat failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("you > What is the capital of France?"));
    assert!(stdout.contains("rag > Paris."));
    assert!(stdout.contains("goodbye"));
}

#[tokio::test]
async fn chat_blocks_questions_until_a_document_is_added() {
    let server = MockServer::start().await;
    mount_status(&server, 0).await;

    let input = "What is anything?\n:q\n";
    let (_, stderr, success) = run_rag_with_stdin(&server.uri(), &["chat"], input);
    assert!(success, "chat should exit cleanly: stderr={}", stderr);
    assert!(stderr.contains("add some documents"), "stderr={}", stderr);
    assert!(requests_to(&server, "POST", "/ask").await.is_empty());
}

#[tokio::test]
async fn chat_clear_asks_for_confirmation_and_stays_local() {
    let server = MockServer::start().await;
    mount_status(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/ingest"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let input = ":add something worth keeping\n:clear\ny\n:docs\n:q\n";
    let (stdout, _, success) = run_rag_with_stdin(&server.uri(), &["chat"], input);
    assert!(success);
    assert!(stdout.contains("no local documents yet"));
    // The only POST was the :add — clearing is purely local.
    assert_eq!(requests_to(&server, "POST", "/ingest").await.len(), 1);
}
