use algosearch_core::persist::{save_artifacts, IndexPaths};
use algosearch_core::{build, RawDocument, SearchEngine, Source};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn doc(title: &str, source: Source, text: &str) -> RawDocument {
    RawDocument {
        title: title.into(),
        url: format!("https://example.com/{title}"),
        source,
        raw_text: text.into(),
    }
}

fn build_tiny_index(dir: &Path, docs: &[RawDocument]) -> Arc<SearchEngine> {
    let paths = IndexPaths::new(dir);
    save_artifacts(&paths, &build(docs)).unwrap();
    Arc::new(SearchEngine::open(paths).unwrap())
}

fn sample_docs() -> Vec<RawDocument> {
    vec![
        doc("Binary Search", Source::Leetcode, "Binary Search Array Easy"),
        doc("Depth First Search", Source::Codeforces, "Depth First Search graphs"),
        doc("Binary Tree Paths", Source::Leetcode, "Binary Tree Paths Tree Medium"),
    ]
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    let app = server::build_app_with(build_tiny_index(dir.path(), &sample_docs()), None);

    let (status, json) = get(app, "/api/search?q=Binary&method=tfidf&top_k=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["method"], "tfidf");
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"], 0);
    assert_eq!(arr[1]["doc_id"], 2);
    assert_eq!(arr[0]["source"], "leetcode");
}

#[tokio::test]
async fn compare_returns_both_models() {
    let dir = tempdir().unwrap();
    let app = server::build_app_with(build_tiny_index(dir.path(), &sample_docs()), None);

    let (status, json) = get(app, "/api/search?q=search&method=compare&top_k=1&k1=1.2&b=0.5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tfidf"].as_array().unwrap().len(), 1);
    assert_eq!(json["bm25"].as_array().unwrap().len(), 1);
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn bad_requests_are_rejected() {
    let dir = tempdir().unwrap();
    let engine = build_tiny_index(dir.path(), &sample_docs());
    let app = || server::build_app_with(engine.clone(), None);

    let (status, json) = get(app(), "/api/search?q=%20&method=bm25").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Missing query parameter 'q'");

    let (status, json) = get(app(), "/api/search?q=tree&method=lsi").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Unknown method: lsi");

    let (status, json) = get(app(), "/api/search?q=tree&top_k=-3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn doc_lookup() {
    let dir = tempdir().unwrap();
    let engine = build_tiny_index(dir.path(), &sample_docs());

    let (status, json) = get(server::build_app_with(engine.clone(), None), "/doc/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Depth First Search");
    assert_eq!(json["length"], 4);

    let (status, _) = get(server::build_app_with(engine, None), "/doc/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reload_requires_token_and_swaps_generation() {
    let dir = tempdir().unwrap();
    let engine = build_tiny_index(dir.path(), &sample_docs());
    let app = || server::build_app_with(engine.clone(), Some("secret".into()));

    let req = Request::post("/index/reload").body(Body::empty()).unwrap();
    let (status, _) = call(app(), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let mut docs = sample_docs();
    docs.push(doc("Binary Lifting", Source::Codeforces, "Binary Lifting trees"));
    save_artifacts(&IndexPaths::new(dir.path()), &build(&docs)).unwrap();

    let req = Request::post("/index/reload")
        .header(server::ADMIN_HEADER, "secret")
        .body(Body::empty())
        .unwrap();
    let (status, json) = call(app(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["previous_total_docs"], 3);
    assert_eq!(json["meta"]["total_docs"], 4);

    let (_, json) = get(app(), "/api/search?q=binary&method=bm25").await;
    assert_eq!(json["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn undefined_bm25_parameters_are_rejected() {
    let dir = tempdir().unwrap();
    let engine = build_tiny_index(dir.path(), &sample_docs());
    let app = || server::build_app_with(engine.clone(), None);

    for uri in [
        "/api/search?q=binary&method=bm25&k1=-1&b=0",
        "/api/search?q=binary&method=bm25&b=1.5",
        "/api/search?q=binary&method=compare&k1=NaN",
        "/api/search?q=binary&method=bm25&k1=inf",
    ] {
        let (status, json) = get(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json["error"].as_str().unwrap().contains("invalid BM25 parameter"), "{uri}");
    }

    let (status, json) = get(app(), "/api/search?q=binary&method=bm25&k1=0&b=1").await;
    assert_eq!(status, StatusCode::OK);
    for hit in json["results"].as_array().unwrap() {
        assert!(hit["score"].as_f64().unwrap().is_finite());
    }
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let dir = tempdir().unwrap();
    let app = server::build_app_with(build_tiny_index(dir.path(), &sample_docs()), None);

    let req = Request::get("/health").header("Origin", "https://example.org").body(Body::empty());
    let resp = app.oneshot(req.unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}
