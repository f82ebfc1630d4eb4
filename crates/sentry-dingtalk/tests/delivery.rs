//! Integration tests for webhook delivery.
//!
//! A wiremock server stands in for the DingTalk robot endpoint.

use std::sync::Arc;

use sentry_dingtalk::events::{TAG_IPS, TAG_SERVER_NAME};
use sentry_dingtalk::{
    ChannelError, DingTalkChannel, DingTalkPlugin, EventRecord, GroupRecord, Level, MemoryConfig,
    Notification, NotificationPlugin, PluginConfig,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

fn demo_group(project_id: &str) -> GroupRecord {
    GroupRecord {
        level: Level::Error,
        absolute_url: "https://x/y".to_string(),
        project_name: "Demo".to_string(),
        project_id: project_id.to_string(),
    }
}

fn demo_event() -> EventRecord {
    EventRecord::new("boom", "ValueError")
        .with_tag(TAG_SERVER_NAME, "host1")
        .with_tag(TAG_IPS, "1.2.3.4")
}

fn plugin_for(server: &MockServer, provider: MemoryConfig) -> DingTalkPlugin<MemoryConfig> {
    let endpoint = format!("{}/robot/send", server.uri());
    let channel = DingTalkChannel::with_endpoint(&endpoint).unwrap();
    DingTalkPlugin::with_channel(Arc::new(channel), provider)
}

fn dingtalk_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"}))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn unconfigured_project_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(dingtalk_ok())
        .expect(0)
        .mount(&server)
        .await;

    let plugin = plugin_for(&server, MemoryConfig::new());

    plugin
        .notify(&demo_group("1"), &demo_event(), &PluginConfig::default())
        .await
        .unwrap();
    plugin
        .notify(&demo_group("1"), &demo_event(), &PluginConfig::new(""))
        .await
        .unwrap();
}

#[tokio::test]
async fn configured_project_posts_once_with_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .and(query_param("access_token", "abc123"))
        .and(header("content-type", "application/json"))
        .respond_with(dingtalk_ok())
        .expect(1)
        .mount(&server)
        .await;

    let plugin = plugin_for(&server, MemoryConfig::new());

    plugin
        .notify(&demo_group("1"), &demo_event(), &PluginConfig::new("abc123"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.as_str().contains("access_token=abc123"));
}

#[tokio::test]
async fn payload_is_markdown_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(dingtalk_ok())
        .mount(&server)
        .await;

    let plugin = plugin_for(&server, MemoryConfig::new());
    plugin
        .notify(&demo_group("1"), &demo_event(), &PluginConfig::new("abc123"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(body["msgtype"], "markdown");
    assert_eq!(body["markdown"]["title"], "Demo:ValueError:ERROR");

    let text = body["markdown"]["text"].as_str().unwrap();
    for expected in [
        "type: ValueError",
        "level:ERROR",
        "server: host1",
        "ip:1.2.3.4",
        "msg:boom",
        "[view](https://x/y)",
    ] {
        assert!(text.contains(expected), "missing {expected:?} in {text}");
    }
}

#[tokio::test]
async fn rejected_request_is_not_an_error() {
    for status in [404, 500] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;

        let plugin = plugin_for(&server, MemoryConfig::new());
        let result = plugin
            .notify(&demo_group("1"), &demo_event(), &PluginConfig::new("abc123"))
            .await;

        assert!(result.is_ok(), "status {status} gave {result:?}");
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn transport_failure_is_returned() {
    // Nothing listens on a port whose listener was just closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let channel = DingTalkChannel::with_endpoint(&format!("http://127.0.0.1:{port}/robot/send"))
        .unwrap();
    let plugin = DingTalkPlugin::with_channel(Arc::new(channel), MemoryConfig::new());

    let result = plugin
        .notify(&demo_group("1"), &demo_event(), &PluginConfig::new("abc123"))
        .await;

    assert!(matches!(result, Err(ChannelError::Http(_))));
}

#[tokio::test]
async fn handle_uses_group_project_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("access_token", "project-7-token"))
        .respond_with(dingtalk_ok())
        .expect(1)
        .mount(&server)
        .await;

    let provider = MemoryConfig::new().with_token("7", "project-7-token");
    let plugin = plugin_for(&server, provider);

    assert!(plugin.is_project_configured("7"));
    assert!(!plugin.is_project_configured("8"));

    for project_id in ["7", "8"] {
        plugin
            .handle(&Notification {
                group: demo_group(project_id),
                event: demo_event(),
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn missing_tags_still_deliver() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(dingtalk_ok())
        .expect(1)
        .mount(&server)
        .await;

    let plugin = plugin_for(&server, MemoryConfig::new());
    plugin
        .notify(
            &demo_group("1"),
            &EventRecord::new("boom", "ValueError"),
            &PluginConfig::new("abc123"),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = body["markdown"]["text"].as_str().unwrap();

    assert!(text.contains("> server:  \n\n"));
    assert!(text.contains("> ip: \n\n"));
}
