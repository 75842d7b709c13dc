//! Connection-level tests against a real bound socket.
//!
//! These drive the listener with a raw websocket client rather than the
//! Gridwire client crate, so that deliberately malformed traffic can be
//! sent.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

use gridwire_protocol::types::{Tool, ToolInputSchema};
use gridwire_server::{
    config::ServerConfig, handlers::FunctionToolHandler, registry::HandlerRegistry, ws::WsServer,
};

async fn start_test_server() -> gridwire_server::ServerHandle {
    let registry = Arc::new(HandlerRegistry::new());
    registry.register_tool(FunctionToolHandler::new(
        Tool {
            name: "ping".to_string(),
            description: "Reply with pong".to_string(),
            input_schema: ToolInputSchema::empty(),
        },
        |_args| async { Ok("pong".to_string()) },
    ));

    WsServer::new(registry, ServerConfig::new("test-server", "0.0.0"))
        .start("127.0.0.1:0")
        .await
        .expect("bind")
}

async fn send_and_recv(ws: &mut Ws, text: &str) -> Value {
    ws.send(Message::Text(text.to_string().into()))
        .await
        .expect("send");
    loop {
        match ws.next().await.expect("stream open").expect("read") {
            Message::Text(reply) => return serde_json::from_str(reply.as_str()).expect("json"),
            // Ignore control frames.
            _ => continue,
        }
    }
}

#[tokio::test]
async fn malformed_frame_does_not_kill_the_connection() {
    let handle = start_test_server().await;
    let (mut ws, _) = connect_async(handle.url()).await.expect("connect");

    // Garbage frame: parse error with a null id, connection stays up.
    let reply = send_and_recv(&mut ws, "{{{ not json").await;
    assert_eq!(reply["error"]["code"], -32700);
    assert_eq!(reply["id"], Value::Null);

    // JSON with no method: same classification.
    let reply = send_and_recv(&mut ws, r#"{"jsonrpc":"2.0","id":"1"}"#).await;
    assert_eq!(reply["error"]["code"], -32700);

    // The next valid request still succeeds on the same connection.
    let request = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": {"name": "ping", "arguments": {}},
        "id": "2"
    });
    let reply = send_and_recv(&mut ws, &request.to_string()).await;
    assert_eq!(reply["id"], "2");
    assert_eq!(reply["result"]["content"][0]["text"], "pong");

    ws.close(None).await.expect("close");
    handle.shutdown().await;
}

#[tokio::test]
async fn each_request_gets_exactly_one_response_with_its_id() {
    let handle = start_test_server().await;
    let (mut ws, _) = connect_async(handle.url()).await.expect("connect");

    for id in ["a", "b", "c"] {
        let request = json!({
            "jsonrpc": "2.0",
            "method": "tools/list",
            "params": {},
            "id": id
        });
        let reply = send_and_recv(&mut ws, &request.to_string()).await;
        assert_eq!(reply["id"], id);
        assert!(reply["result"]["tools"].is_array());
    }

    ws.close(None).await.expect("close");
    handle.shutdown().await;
}

#[tokio::test]
async fn connections_are_isolated_from_each_other() {
    let handle = start_test_server().await;

    let (mut first, _) = connect_async(handle.url()).await.expect("connect");
    let (mut second, _) = connect_async(handle.url()).await.expect("connect");

    // Poison the first connection's input; the second is unaffected.
    let reply = send_and_recv(&mut first, "garbage").await;
    assert_eq!(reply["error"]["code"], -32700);

    let request = json!({
        "jsonrpc": "2.0",
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "probe", "version": "0"}
        },
        "id": "1"
    });
    let reply = send_and_recv(&mut second, &request.to_string()).await;
    assert_eq!(reply["result"]["serverInfo"]["name"], "test-server");

    first.close(None).await.expect("close");
    second.close(None).await.expect("close");
    handle.shutdown().await;
}
