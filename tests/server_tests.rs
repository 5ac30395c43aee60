//! JSON-RPC level tests for the MCP server.

use std::collections::HashMap;

use serde_json::{Value, json};
use sp_orders_mcp::auth::CredentialUpdate;
use sp_orders_mcp::mcp::SERVER_NAME;
use sp_orders_mcp::prelude::*;
use tokio::io::AsyncReadExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Feeds `lines` to a server and returns the responses keyed by id.
async fn session(server: &McpServer, lines: &[Value]) -> HashMap<String, Value> {
    let input: String = lines.iter().map(|line| format!("{line}\n")).collect();
    let (writer, mut reader) = tokio::io::duplex(1 << 20);

    server.serve(input.as_bytes(), writer).await.unwrap();

    let mut output = String::new();
    reader.read_to_string(&mut output).await.unwrap();

    output
        .lines()
        .map(|line| {
            let value: Value = serde_json::from_str(line).unwrap();
            (value["id"].to_string(), value)
        })
        .collect()
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

fn is_error(response: &Value) -> bool {
    response["result"]["isError"].as_bool().unwrap_or(false)
}

#[tokio::test]
async fn test_handshake_and_listing() {
    let server = McpServer::new(&Config::default());
    let responses = session(
        &server,
        &[
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "test", "version": "0" }
            }}),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
            json!({ "jsonrpc": "2.0", "id": 3, "method": "ping" }),
        ],
    )
    .await;

    // The notification gets no reply.
    assert_eq!(responses.len(), 3);

    let init = &responses["1"]["result"];
    assert_eq!(init["serverInfo"]["name"], SERVER_NAME);
    assert!(init["capabilities"]["tools"].is_object());

    let names: Vec<&str> = responses["2"]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "credentials",
            "search_orders",
            "get_order",
            "cancel_order",
            "update_shipment_status",
            "update_verification_status",
            "confirm_shipment",
            "get_order_regulated_info",
            "migration_assistant",
        ]
    );
    for tool in responses["2"]["result"]["tools"].as_array().unwrap() {
        assert_eq!(tool["inputSchema"]["type"], "object");
    }

    assert_eq!(responses["3"]["result"], json!({}));
}

#[tokio::test]
async fn test_protocol_errors() {
    let server = McpServer::new(&Config::default());
    let responses = session(
        &server,
        &[
            json!({ "jsonrpc": "2.0", "id": 1, "method": "resources/list" }),
            call(2, "delete_everything", json!({})),
            json!({ "jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": { "arguments": {} } }),
        ],
    )
    .await;

    assert_eq!(responses["1"]["error"]["code"], -32601);
    assert_eq!(responses["2"]["error"]["code"], -32602);
    assert_eq!(responses["2"]["error"]["message"], "Unknown tool: delete_everything");
    assert_eq!(responses["3"]["error"]["code"], -32602);
}

#[tokio::test]
async fn test_parse_error_does_not_stop_the_loop() {
    let server = McpServer::new(&Config::default());
    let input = "this is not json\n{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"ping\"}\n";
    let (writer, mut reader) = tokio::io::duplex(1 << 16);

    server.serve(input.as_bytes(), writer).await.unwrap();

    let mut output = String::new();
    reader.read_to_string(&mut output).await.unwrap();
    let responses: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    assert!(
        responses
            .iter()
            .any(|r| r["id"].is_null() && r["error"]["code"] == -32700)
    );
    assert!(responses.iter().any(|r| r["id"] == 9));
}

#[tokio::test]
async fn test_tools_report_failures_as_results() {
    let server = McpServer::new(&Config::default());
    let responses = session(
        &server,
        &[
            call(1, "search_orders", json!({ "createdAfter": "2025-01-01T00:00:00Z" })),
            call(
                2,
                "migration_assistant",
                json!({ "source_version": "orders-v1", "target_version": "orders-v2" }),
            ),
            call(3, "credentials", json!({ "action": "configure" })),
        ],
    )
    .await;

    let search = &responses["1"];
    assert!(is_error(search));
    assert!(tool_text(search).contains("SP-API Credentials Required"));
    assert!(tool_text(search).contains("export SP_API_CLIENT_ID"));

    let migration = &responses["2"];
    assert!(is_error(migration));
    assert!(tool_text(migration).contains("Unsupported migration path: orders-v1 → orders-v2"));
    assert!(tool_text(migration).contains("Supported migrations:\n- orders-v0 → orders-2026-01-01"));

    let credentials = &responses["3"];
    assert!(is_error(credentials));
    assert!(tool_text(credentials).contains("No credentials provided"));
}

#[tokio::test]
async fn test_migration_tool_needs_no_credentials() {
    let server = McpServer::new(&Config::default());
    let responses = session(
        &server,
        &[call(
            1,
            "migration_assistant",
            json!({
                "source_code": "const info = await getOrderBuyerInfo(orderId);",
                "source_version": "orders-v0",
                "target_version": "orders-2026-01-01",
                "language": "typescript"
            }),
        )],
    )
    .await;

    let response = &responses["1"];
    assert!(!is_error(response));
    let text = tool_text(response);
    assert!(text.contains("# Migration Analysis Report"));
    assert!(text.contains("```typescript"));
    assert!(text.contains("Continue using the legacy v0 path"));
}

#[tokio::test]
async fn test_configured_server_calls_the_api() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/o2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "Atza|server-token",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/orders/2026-01-01/orders/902-1845936-5435065"))
        .and(header("x-amz-access-token", "Atza|server-token"))
        .and(query_param("includedData", "BUYER,RECIPIENT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order": {
                "orderId": "902-1845936-5435065",
                "createdTime": "2025-06-01T10:00:00Z",
                "fulfillment": { "fulfillmentStatus": "SHIPPED" }
            }
        })))
        .expect(1)
        .mount(&api)
        .await;

    let config = Config {
        token_endpoint: format!("{}/auth/o2/token", api.uri()),
        ..Config::default()
    };
    let server = McpServer::new(&config);

    let responses = session(
        &server,
        &[call(
            1,
            "credentials",
            json!({
                "action": "configure",
                "clientId": "amzn1.application-oa2-client.test",
                "clientSecret": "client-secret",
                "refreshToken": "Atzr|refresh-token",
                "baseUrl": api.uri()
            }),
        )],
    )
    .await;
    assert!(tool_text(&responses["1"]).starts_with("Credentials fully configured."));

    let responses = session(
        &server,
        &[call(
            2,
            "get_order",
            json!({ "orderId": "902-1845936-5435065", "includedData": ["BUYER", "RECIPIENT"] }),
        )],
    )
    .await;
    let response = &responses["2"];
    assert!(!is_error(response), "{response}");
    assert!(tool_text(response).contains("Order ID: 902-1845936-5435065"));

    api.verify().await;
}

#[tokio::test]
async fn test_api_errors_use_tool_context() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/o2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "Atza|server-token",
            "expires_in": 3600
        })))
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path("/orders/v0/orders/ORDER-1/shipment"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{ "code": "InvalidInput", "message": "Invalid shipment status" }]
        })))
        .mount(&api)
        .await;

    let config = Config {
        credentials: CredentialUpdate {
            client_id: Some("client".into()),
            client_secret: Some("secret".into()),
            refresh_token: Some("refresh".into()),
            base_url: Some(api.uri()),
        },
        token_endpoint: format!("{}/auth/o2/token", api.uri()),
        ..Config::default()
    };
    let server = McpServer::new(&config);

    let responses = session(
        &server,
        &[call(
            1,
            "update_shipment_status",
            json!({ "orderId": "ORDER-1", "shipmentStatus": "PickedUp" }),
        )],
    )
    .await;

    let response = &responses["1"];
    assert!(is_error(response));
    assert_eq!(
        tool_text(response),
        "Error updating shipment status: API request failed (400): InvalidInput: Invalid shipment status"
    );
}
