//! `reviews list` paging against a mock androidpublisher upstream.

use super::test_utils::{gplay_against, run, stdout_json};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REVIEWS_PATH: &str = "/androidpublisher/v3/applications/com.example.app/reviews";

/// Three pages of one review each; the third carries no token.
async fn three_page_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REVIEWS_PATH))
        .and(query_param("token", "t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reviews": [{"reviewId": "r2", "authorName": "Bo"}],
            "tokenPagination": {"nextPageToken": "t3"}
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(REVIEWS_PATH))
        .and(query_param("token", "t3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reviews": [{"reviewId": "r3", "authorName": "Cy"}]
        })))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(REVIEWS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reviews": [{"reviewId": "r1", "authorName": "Al"}],
            "tokenPagination": {"nextPageToken": "t2"}
        })))
        .with_priority(5)
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_all_folds_every_page() {
    let server = three_page_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = gplay_against(home.path(), &server.uri());
    cmd.args(["reviews", "list", "--package", "com.example.app", "--all"]);

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(0));
    let envelope = stdout_json(&output);
    let ids: Vec<&str> = envelope["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["reviewId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["r1", "r2", "r3"]);
    assert_eq!(envelope["error"], serde_json::Value::Null);
    assert_eq!(envelope["meta"]["pagination"]["startToken"], "");
    assert_eq!(envelope["meta"]["pagination"]["nextToken"], "");
    assert_eq!(envelope["meta"]["services"], json!(["androidpublisher"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_page_records_next_token() {
    let server = three_page_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = gplay_against(home.path(), &server.uri());
    cmd.args(["reviews", "list", "--package", "com.example.app"]);

    let envelope = stdout_json(&run(cmd).await);
    assert_eq!(envelope["data"].as_array().unwrap().len(), 1);
    assert_eq!(envelope["meta"]["pagination"]["nextToken"], "t2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resume_from_page_token() {
    let server = three_page_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = gplay_against(home.path(), &server.uri());
    cmd.args([
        "reviews",
        "list",
        "--package",
        "com.example.app",
        "--page-token",
        "t2",
        "--all",
    ]);

    let envelope = stdout_json(&run(cmd).await);
    assert_eq!(envelope["data"].as_array().unwrap().len(), 2);
    assert_eq!(envelope["meta"]["pagination"]["startToken"], "t2");
    assert_eq!(envelope["meta"]["pagination"]["nextToken"], "");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_max_pages_truncates_with_warning() {
    let server = three_page_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = gplay_against(home.path(), &server.uri());
    cmd.args([
        "reviews",
        "list",
        "--package",
        "com.example.app",
        "--all",
        "--max-pages",
        "2",
    ]);

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(0));
    let envelope = stdout_json(&output);
    assert_eq!(envelope["data"].as_array().unwrap().len(), 2);
    assert_eq!(envelope["meta"]["pagination"]["nextToken"], "t3");
    assert_eq!(envelope["meta"]["warnings"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_page_size_is_clamped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REVIEWS_PATH))
        .and(query_param("maxResults", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reviews": []})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = gplay_against(home.path(), &server.uri());
    cmd.args([
        "reviews",
        "list",
        "--package",
        "com.example.app",
        "--page-size",
        "500",
    ]);

    let envelope = stdout_json(&run(cmd).await);
    assert_eq!(envelope["data"], json!([]));
    let warnings = envelope["meta"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("100"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_table_output_with_warnings_on_stderr() {
    let server = three_page_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = gplay_against(home.path(), &server.uri());
    cmd.args([
        "reviews",
        "list",
        "--package",
        "com.example.app",
        "--all",
        "--max-pages",
        "1",
        "--output",
        "table",
    ]);

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reviewId"));
    assert!(stdout.contains("r1"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning: "));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fields_projection_over_reviews() {
    let server = three_page_server().await;
    let home = TempDir::new().unwrap();
    let mut cmd = gplay_against(home.path(), &server.uri());
    cmd.args([
        "reviews",
        "list",
        "--package",
        "com.example.app",
        "--all",
        "--fields",
        "data.*.reviewId,meta.pagination",
    ]);

    let envelope = stdout_json(&run(cmd).await);
    assert_eq!(
        envelope,
        json!({
            "data": [{"reviewId": "r1"}, {"reviewId": "r2"}, {"reviewId": "r3"}],
            "meta": {"pagination": {"startToken": "", "nextToken": ""}}
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reviews_get_single_review() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/r42", REVIEWS_PATH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reviewId": "r42",
            "comments": [{"userComment": {"text": "Great", "starRating": 5}}]
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let mut cmd = gplay_against(home.path(), &server.uri());
    cmd.args([
        "reviews",
        "get",
        "--package",
        "com.example.app",
        "--review-id",
        "r42",
    ]);

    let output = run(cmd).await;
    assert_eq!(output.status.code(), Some(0));
    let envelope = stdout_json(&output);
    assert_eq!(envelope["data"]["reviewId"], "r42");
    assert_eq!(envelope["meta"]["pagination"]["nextToken"], "");
}
