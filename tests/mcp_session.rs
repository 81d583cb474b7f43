//! End-to-end MCP sessions against a secrets file on disk.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use totp_mcp::accounts::AccountRegistry;
use totp_mcp::dispatcher::ToolDispatcher;
use totp_mcp::mcp::McpServer;
use totp_mcp::secrets::SecretsFile;
use totp_mcp::totp::FixedClock;

const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

fn session(secrets: Option<&str>, now: u64, requests: &[Value]) -> Vec<Value> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".nutrie-secrets");
    if let Some(content) = secrets {
        std::fs::write(&path, content).unwrap();
    }

    let server = McpServer::new(ToolDispatcher::with_clock(
        AccountRegistry::default(),
        SecretsFile::new(&path),
        FixedClock(now),
    ));

    let input: String = requests
        .iter()
        .map(|request| format!("{request}\n"))
        .collect();
    let mut output = Vec::new();
    server.run(input.as_bytes(), &mut output).unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
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

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[test]
fn full_session_generates_codes() {
    let secrets = format!("# team secrets\nGOOGLE_TOTP_SECRET={RFC_SECRET}\nbroken line\n");
    let responses = session(
        Some(&secrets),
        59,
        &[
            json!({ "jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "test", "version": "0" }
            }}),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
            json!({ "jsonrpc": "2.0", "id": 1, "method": "tools/list" }),
            call(2, "get_totp_code", json!({ "account": "Google" })),
            call(3, "list_totp_accounts", json!({})),
        ],
    );

    assert_eq!(4, responses.len());

    let tools: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(vec!["get_totp_code", "list_totp_accounts"], tools);

    assert_eq!(
        "TOTP code for Google: 287082\nValid for 1 more seconds",
        text(&responses[2])
    );
    assert_eq!(
        "Available TOTP accounts:\n- google: configured\n- codiedev42: configured",
        text(&responses[3])
    );
}

#[test]
fn alias_and_canonical_name_share_a_code() {
    let secrets = format!("GOOGLE_TOTP_SECRET={RFC_SECRET}\n");
    let responses = session(
        Some(&secrets),
        1111111109,
        &[
            call(1, "get_totp_code", json!({ "account": "google" })),
            call(2, "get_totp_code", json!({ "account": "codiedev42" })),
        ],
    );

    assert_eq!(
        "TOTP code for google: 081804\nValid for 1 more seconds",
        text(&responses[0])
    );
    assert_eq!(
        "TOTP code for codiedev42: 081804\nValid for 1 more seconds",
        text(&responses[1])
    );
}

#[test]
fn missing_secrets_file_degrades_to_text_errors() {
    let responses = session(
        None,
        59,
        &[
            call(1, "get_totp_code", json!({ "account": "google" })),
            call(2, "get_totp_code", json!({ "account": "unknown" })),
            call(3, "list_totp_accounts", json!({})),
            call(4, "rotate_secret", json!({})),
        ],
    );

    assert_eq!(4, responses.len());
    assert!(responses.iter().all(|r| r.get("error").is_none()));

    assert_eq!(
        "Error: No secret found for GOOGLE_TOTP_SECRET in secrets file",
        text(&responses[0])
    );
    assert!(text(&responses[1]).starts_with("Error: Unknown account:"));
    assert!(text(&responses[1]).ends_with("Available: google, codiedev42"));
    assert_eq!(
        "Available TOTP accounts:\n\
         - google: NOT configured (missing GOOGLE_TOTP_SECRET)\n\
         - codiedev42: NOT configured (missing GOOGLE_TOTP_SECRET)",
        text(&responses[2])
    );
    assert_eq!("Unknown tool: rotate_secret", text(&responses[3]));
}
