//! End-to-end record/playback through real listeners.

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use vcr_proxy::admin_api::AdminApiServer;
use vcr_proxy::config::UpstreamConfig;
use vcr_proxy::proxy::{HttpUpstream, ProxyHandler, ProxyServer, ProxyState};
use vcr_proxy::recording::{fingerprint, sanitize_host, FileRepository, Mode};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    proxy_url: String,
    admin_url: String,
    client: reqwest::Client,
    _storage: TempDir,
    storage_path: std::path::PathBuf,
}

async fn start(mode: Mode) -> Harness {
    let storage = TempDir::new().unwrap();
    let storage_path = storage.path().to_path_buf();
    let repository = Arc::new(FileRepository::open(&storage_path).unwrap());
    let state = Arc::new(ProxyState::new(mode, repository));
    let upstream = Arc::new(HttpUpstream::new(&UpstreamConfig::default()).unwrap());
    let handler = Arc::new(ProxyHandler::new(Arc::clone(&state), upstream));

    let proxy_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let admin_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let proxy_url = format!("http://{}", proxy_listener.local_addr().unwrap());
    let admin_url = format!("http://{}", admin_listener.local_addr().unwrap());

    let proxy = ProxyServer::new(proxy_listener.local_addr().unwrap(), handler);
    tokio::spawn(proxy.serve(proxy_listener));
    let admin = AdminApiServer::new(admin_listener.local_addr().unwrap(), state);
    tokio::spawn(admin.serve(admin_listener));

    Harness {
        proxy_url,
        admin_url,
        client: reqwest::Client::builder().no_proxy().build().unwrap(),
        _storage: storage,
        storage_path,
    }
}

impl Harness {
    fn proxied(&self, target: &str) -> String {
        format!(
            "{}/users?target={}",
            self.proxy_url,
            urlencoding::encode(target)
        )
    }

    async fn post_user(&self, target: &str, tenant: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.proxied(target))
            .header("X-Tenant", tenant)
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .unwrap()
    }

    async fn admin_json(
        &self,
        method: reqwest::Method,
        route: &str,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut req = self
            .client
            .request(method, format!("{}{}", self.admin_url, route));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

#[tokio::test]
async fn test_record_switch_and_replay() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("x-upstream", "real")
                .set_body_raw(r#"{"id":1,"name":"Alice"}"#, "application/json"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let harness = start(Mode::Record).await;
    let target = format!("{}/users", upstream.uri());

    // Record
    let live = harness
        .post_user(&target, "org-123", r#"{"name":"Alice"}"#)
        .await;
    assert_eq!(live.status().as_u16(), 201);
    assert_eq!(live.headers()["x-upstream"], "real");
    let live_body = live.bytes().await.unwrap();

    // Stored under the sanitized host, named by fingerprint
    let host = target
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap()
        .to_string();
    let expected_file = harness
        .storage_path
        .join(sanitize_host(&host))
        .join(format!("{}.json", fingerprint("POST", &target, br#"{"name":"Alice"}"#)));
    assert!(expected_file.is_file(), "missing {}", expected_file.display());
    let stored: Value = serde_json::from_slice(&std::fs::read(&expected_file).unwrap()).unwrap();
    assert_eq!(stored["request"]["url"], target.as_str());
    assert_eq!(stored["response"]["status_code"], 201);

    // Switch to playback
    let (status, body) = harness
        .admin_json(reqwest::Method::PUT, "/api/mode", Some(json!({"mode": "playback"})))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["mode"], "playback");

    // Different tenant header, same method/url/body: replayed
    let replay = harness
        .post_user(&target, "org-456", r#"{"name":"Alice"}"#)
        .await;
    assert_eq!(replay.status().as_u16(), 201);
    assert_eq!(replay.headers()["x-upstream"], "real");
    assert_eq!(replay.bytes().await.unwrap(), live_body);

    // Different body: miss
    let miss = harness
        .post_user(&target, "org-123", r#"{"name":"Bob"}"#)
        .await;
    assert_eq!(miss.status().as_u16(), 404);
    let miss_body: Value = miss.json().await.unwrap();
    assert!(miss_body["error"]
        .as_str()
        .unwrap()
        .contains("No recording found"));

    let (_, stats) = harness
        .admin_json(reqwest::Method::GET, "/api/stats", None)
        .await;
    assert_eq!(stats["record_count"], 1);
    assert_eq!(stats["playback_hits"], 1);
    assert_eq!(stats["playback_misses"], 1);
    assert_eq!(stats["recordings"], 1);
    assert_eq!(stats["mode"], "playback");

    let (_, history) = harness
        .admin_json(reqwest::Method::GET, "/api/history?limit=10", None)
        .await;
    assert_eq!(history["count"], 2);
    assert_eq!(history["history"][0]["recorded"], false);
    assert_eq!(history["history"][1]["recorded"], true);
}

#[tokio::test]
async fn test_clear_then_playback_misses() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&upstream)
        .await;

    let harness = start(Mode::Record).await;
    let target = format!("{}/ping", upstream.uri());
    let url = format!(
        "{}/?target={}",
        harness.proxy_url,
        urlencoding::encode(&target)
    );

    let resp = harness.client.get(&url).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let (_, recordings) = harness
        .admin_json(reqwest::Method::GET, "/api/recordings", None)
        .await;
    assert_eq!(recordings["count"], 1);
    let id = recordings["recordings"][0]["id"].as_str().unwrap().to_string();

    let (status, one) = harness
        .admin_json(reqwest::Method::GET, &format!("/api/recordings/{id}"), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(one["request"]["url"], target.as_str());

    let (status, _) = harness
        .admin_json(reqwest::Method::DELETE, "/api/recordings", None)
        .await;
    assert_eq!(status, 200);
    let (status, _) = harness
        .admin_json(reqwest::Method::DELETE, "/api/recordings", None)
        .await;
    assert_eq!(status, 200);

    harness
        .admin_json(reqwest::Method::POST, "/api/mode?mode=playback", None)
        .await;
    let resp = harness.client.get(&url).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn test_missing_target_and_unreachable_upstream() {
    let harness = start(Mode::Record).await;

    let resp = harness
        .client
        .get(format!("{}/users", harness.proxy_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("target"));

    // Bind then drop to get a port nothing listens on
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);

    let resp = harness
        .client
        .get(format!("{}/?target=http://{addr}/", harness.proxy_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);

    let (_, stats) = harness
        .admin_json(reqwest::Method::GET, "/api/stats", None)
        .await;
    assert_eq!(stats["record_count"], 0);
    assert_eq!(stats["playback_misses"], 0);
}

#[tokio::test]
async fn test_health_and_unknown_admin_route() {
    let harness = start(Mode::Playback).await;

    let (status, body) = harness
        .admin_json(reqwest::Method::GET, "/health", None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = harness
        .admin_json(reqwest::Method::GET, "/api/nope", None)
        .await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Not Found"}));

    // One proxied request so the request metrics exist
    harness
        .client
        .get(format!("{}/?target=api.example.com/", harness.proxy_url))
        .send()
        .await
        .unwrap();

    let metrics = harness
        .client
        .get(format!("{}/metrics", harness.admin_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(metrics.contains("vcr_proxy_requests_total"));
    assert!(metrics.contains(r#"outcome="miss""#));
}
