//! Integration tests for Suarify MCP
//!
//! These tests drive tools through the registry and through MCP `tools/call`
//! frames against a stubbed upstream, and check the request each tool sends
//! and the result it returns.

use mockito::{Matcher, Server};
use serde_json::{json, Value};
use suarify_mcp::config::Config;
use suarify_mcp::mcp::catalogue::definitions;
use suarify_mcp::mcp::{McpServer, ToolRegistry};
use suarify_mcp::models::Placement;
use suarify_mcp::upstream::{UpstreamClient, AUTH_REMEDIATION};

fn registry_for(url: &str, api_key: Option<&str>) -> ToolRegistry {
    let config = Config {
        base_url: url.to_string(),
        api_key: api_key.map(str::to_string),
        ..Config::default()
    };
    let client = UpstreamClient::new(&config).unwrap();
    ToolRegistry::catalogue(&client, true)
}

/// Sample arguments satisfying each tool's required parameters
fn sample_args(name: &str) -> Value {
    match name {
        "setup_inbound_settings" => json!({"phonenumber": "0123456789", "params": {"main_voice": "alloy"}}),
        "setup_phone_configuration" => json!({"phonenumber": "0123456789", "provider": "twilio"}),
        "initiate_call" => json!({"phonenumber": "0123456789", "status": "LIVE"}),
        "do_outbound_call" => json!({"phonenumber": "0123456789", "password": "LIVE", "prompt": "Say hi"}),
        "create_lead" => json!({"phonenumber": "0123456789", "name": "Aisyah"}),
        "bulk_upload_leads" => json!({"leads": [{"phonenumber": "0111"}, {"phonenumber": "0222"}]}),
        "update_lead" => json!({"id": "lead-1", "status": "qualified", "notes": "call back"}),
        "get_user_agent" | "delete_user_agent" | "get_lead" | "delete_lead" => json!({"id": "x-42"}),
        "get_inbound_settings" | "get_phone_configuration" => json!({"phonenumber": "0123456789"}),
        _ => json!({"limit": 5, "offset": 10}),
    }
}

#[tokio::test]
async fn test_server_initialization() {
    let registry = registry_for("http://localhost:1", Some("sk-test"));
    let server = McpServer::new(registry);
    assert_eq!(server.tool_count(), 34);
}

#[tokio::test]
async fn test_every_tool_returns_upstream_payload_unchanged() {
    for def in definitions() {
        let mut server = Server::new_async().await;
        let args = sample_args(def.name);
        let path = def.route.path.replace("{id}", "x-42");
        let payload = json!({"tool": def.name, "nested": {"values": [1, 2.5, null, "s"]}});

        let mock = server
            .mock(def.route.method.as_str(), path.as_str())
            .match_query(Matcher::Any)
            .match_header("x-api-key", "sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(payload.to_string())
            .create_async()
            .await;

        let registry = registry_for(&server.url(), Some("sk-test"));
        let envelope = registry
            .execute(&def.canonical_name(), args)
            .await
            .unwrap();

        assert!(!envelope.is_error, "{} returned an error envelope", def.name);
        assert_eq!(envelope.structured_content, Some(payload), "{}", def.name);
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_query_tools_forward_arguments_as_query() {
    for def in definitions() {
        if !matches!(def.route.placement, Placement::Query) {
            continue;
        }

        let mut server = Server::new_async().await;
        let args = sample_args(def.name);
        let expected: Vec<Matcher> = args
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| {
                let value = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
                Matcher::UrlEncoded(k.clone(), value)
            })
            .collect();

        let mock = server
            .mock("GET", def.route.path)
            .match_query(Matcher::AllOf(expected))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let registry = registry_for(&server.url(), Some("sk-test"));
        let envelope = registry.execute(def.name, args).await.unwrap();
        assert!(!envelope.is_error, "{}", def.name);
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_body_tools_send_arguments_verbatim() {
    for def in definitions() {
        if !matches!(def.route.placement, Placement::Body) {
            continue;
        }

        let mut server = Server::new_async().await;
        let args = sample_args(def.name);

        let mock = server
            .mock(def.route.method.as_str(), def.route.path)
            .match_body(args.to_string().as_str())
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let registry = registry_for(&server.url(), Some("sk-test"));
        let envelope = registry.execute(def.name, args).await.unwrap();
        assert!(!envelope.is_error, "{}", def.name);
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_path_id_never_sent_in_query_or_body() {
    let mut server = Server::new_async().await;

    let get_agent = server
        .mock("GET", "/api/user-agents/agent-9")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"id":"agent-9"}"#)
        .create_async()
        .await;
    let delete_agent = server
        .mock("DELETE", "/api/user-agents/agent-9")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"deleted":true}"#)
        .create_async()
        .await;
    let get_lead = server
        .mock("GET", "/api/user-leads/lead-1")
        .match_query(Matcher::Missing)
        .match_body(Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"id":"lead-1"}"#)
        .create_async()
        .await;
    let update_lead = server
        .mock("PATCH", "/api/user-leads/lead-1")
        .match_body(r#"{"status":"qualified"}"#)
        .with_status(200)
        .with_body(r#"{"id":"lead-1","status":"qualified"}"#)
        .create_async()
        .await;
    let delete_lead = server
        .mock("DELETE", "/api/user-leads/lead-1")
        .match_query(Matcher::Missing)
        .match_body(Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"deleted":true}"#)
        .create_async()
        .await;

    let registry = registry_for(&server.url(), Some("sk-test"));
    let calls = [
        ("get_user_agent", json!({"id": "agent-9"})),
        ("delete_user_agent", json!({"id": "agent-9"})),
        ("get_lead", json!({"id": "lead-1"})),
        ("update_lead", json!({"id": "lead-1", "status": "qualified"})),
        ("delete_lead", json!({"id": "lead-1"})),
    ];
    for (tool, args) in calls {
        let envelope = registry.execute(tool, args).await.unwrap();
        assert!(!envelope.is_error, "{}: {}", tool, envelope.text());
    }

    get_agent.assert_async().await;
    delete_agent.assert_async().await;
    get_lead.assert_async().await;
    update_lead.assert_async().await;
    delete_lead.assert_async().await;
}

#[tokio::test]
async fn test_auth_failure_includes_remediation() {
    for status in [401, 403] {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/user-leads")
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(r#"{"error":"Invalid API key"}"#)
            .create_async()
            .await;

        let registry = registry_for(&server.url(), None);
        let envelope = registry
            .execute("suarify_list_leads", json!({}))
            .await
            .unwrap();

        assert!(envelope.is_error);
        let text = envelope.text();
        assert!(text.starts_with(&format!("API Error ({}): ", status)));
        assert_eq!(text.matches(AUTH_REMEDIATION).count(), 1);
        assert!(text.ends_with(r#" - {"error":"Invalid API key"}"#));
    }
}

#[tokio::test]
async fn test_network_failure_reports_network_status() {
    // Nothing listens on port 1
    let registry = registry_for("http://127.0.0.1:1", Some("sk-test"));
    let envelope = registry
        .execute("suarify_get_lead", json!({"id": "lead-1"}))
        .await
        .unwrap();

    assert!(envelope.is_error);
    assert!(envelope.structured_content.is_none());
    assert!(envelope.text().starts_with("API Error (Network): "));
}

#[tokio::test]
async fn test_get_lead_is_idempotent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/user-leads/lead-1")
        .with_status(200)
        .with_body(r#"{"id":"lead-1","name":"Aisyah","status":"new"}"#)
        .expect(2)
        .create_async()
        .await;

    let registry = registry_for(&server.url(), Some("sk-test"));
    let first = registry
        .execute("suarify_get_lead", json!({"id": "lead-1"}))
        .await
        .unwrap();
    let second = registry
        .execute("suarify_get_lead", json!({"id": "lead-1"}))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_setup_inbound_settings_with_raw_params() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/inbound-phone-settings")
        .match_body(r#"{"phonenumber":"0123456789","params":"{\"main_voice\":\"alloy\"}"}"#)
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let registry = registry_for(&server.url(), Some("sk-test"));
    let envelope = registry
        .execute(
            "setup_inbound_settings",
            json!({"phonenumber": "0123456789", "params": "{\"main_voice\":\"alloy\"}"}),
        )
        .await
        .unwrap();

    assert!(!envelope.is_error);
    assert_eq!(envelope.structured_content, Some(json!({"success": true})));
    assert!(envelope.text().contains("configured"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_leads_scenario() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/user-leads")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("offset".into(), "20".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"leads":[]}"#)
        .create_async()
        .await;

    let registry = registry_for(&server.url(), Some("sk-test"));
    let envelope = registry
        .execute("list_leads", json!({"limit": 10, "offset": 20}))
        .await
        .unwrap();

    assert!(!envelope.is_error);
    assert_eq!(envelope.structured_content, Some(json!({"leads": []})));
    assert!(envelope.text().starts_with("Retrieved 0 leads"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_leads_applies_default_paging() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/user-leads")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "50".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"leads":[{"id":"a"},{"id":"b"}]}"#)
        .create_async()
        .await;

    let registry = registry_for(&server.url(), Some("sk-test"));
    let envelope = registry
        .execute("suarify_list_leads", json!({}))
        .await
        .unwrap();

    assert!(envelope.text().starts_with("Retrieved 2 leads"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_legacy_and_canonical_names_behave_identically() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/user-agents")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"agents":[{"id":"a1"}]}"#)
        .expect(2)
        .create_async()
        .await;

    let registry = registry_for(&server.url(), Some("sk-test"));
    let legacy = registry
        .execute("list_user_agents", json!({}))
        .await
        .unwrap();
    let canonical = registry
        .execute("suarify_list_user_agents", json!({}))
        .await
        .unwrap();

    assert_eq!(legacy, canonical);
    mock.assert_async().await;
}

fn tools_call(id: u64, tool: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": tool, "arguments": arguments}
    })
    .to_string()
}

#[tokio::test]
async fn test_mcp_session_reports_results_at_top_level() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/api/user-leads")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("offset".into(), "20".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"leads":[]}"#)
        .create_async()
        .await;
    let denied = server
        .mock("DELETE", "/api/user-leads/lead-1")
        .with_status(401)
        .with_body(r#"{"error":"Invalid API key"}"#)
        .create_async()
        .await;

    let mcp = McpServer::new(registry_for(&server.url(), None));

    let init = mcp
        .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"test","version":"0"}}}"#)
        .await
        .unwrap();
    assert_eq!(init["result"]["protocolVersion"], "2025-03-26");
    assert!(mcp
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await
        .is_none());

    let listed = mcp
        .handle_line(&tools_call(2, "suarify_list_leads", json!({"limit": 10, "offset": 20})))
        .await
        .unwrap();
    assert_eq!(listed["id"], 2);
    assert_eq!(listed["result"]["isError"], json!(false));
    assert_eq!(listed["result"]["structuredContent"], json!({"leads": []}));
    assert!(listed["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Retrieved 0 leads"));

    let deleted = mcp
        .handle_line(&tools_call(3, "delete_lead", json!({"id": "lead-1"})))
        .await
        .unwrap();
    assert_eq!(deleted["result"]["isError"], json!(true));
    assert!(deleted["result"].get("structuredContent").is_none());
    let text = deleted["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("API Error (401): "));
    assert_eq!(text.matches(AUTH_REMEDIATION).count(), 1);

    ok.assert_async().await;
    denied.assert_async().await;
}

#[tokio::test]
async fn test_mcp_network_failure_is_error_result() {
    let mcp = McpServer::new(registry_for("http://127.0.0.1:1", Some("sk-test")));
    let response = mcp
        .handle_line(&tools_call(9, "suarify_get_lead", json!({"id": "l-1"})))
        .await
        .unwrap();

    assert!(response.get("error").is_none());
    assert_eq!(response["result"]["isError"], json!(true));
    assert!(response["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("API Error (Network): "));
}

#[tokio::test]
async fn test_numeric_id_is_interpolated_into_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/user-leads/42")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"id":42}"#)
        .create_async()
        .await;

    let registry = registry_for(&server.url(), Some("sk-test"));
    let envelope = registry
        .execute("suarify_get_lead", json!({"id": 42}))
        .await
        .unwrap();

    assert!(!envelope.is_error, "{}", envelope.text());
    assert_eq!(envelope.structured_content, Some(json!({"id": 42})));
    mock.assert_async().await;
}
