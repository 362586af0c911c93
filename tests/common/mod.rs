//! Shared utilities for integration testing against a scripted JSON-RPC node.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Outcome of one scripted JSON-RPC call.
#[allow(dead_code)]
pub enum RpcReply {
    Result(Value),
    Error(i64, String),
    /// Reply after a delay, to exercise client timeouts.
    Delayed(Duration, Value),
}

/// Every `(method, params)` pair the mock node received, in order.
#[derive(Clone, Default)]
pub struct RpcLog(Arc<Mutex<Vec<(String, Value)>>>);

#[allow(dead_code)]
impl RpcLog {
    pub fn methods(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn params(&self, method: &str) -> Vec<Value> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

/// Start a mock node answering each JSON-RPC request with `handler(method, params)`.
///
/// Returns the HTTP URL to connect to and the request log.
pub async fn start_rpc_backend<F>(handler: F) -> (String, RpcLog)
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);
    let log = RpcLog::default();
    let server_log = log.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let log = server_log.clone();
                    tokio::spawn(async move {
                        serve_connection(socket, handler.as_ref(), log).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (format!("http://{}", addr), log)
}

async fn serve_connection<F>(mut socket: TcpStream, handler: &F, log: RpcLog)
where
    F: Fn(&str, &Value) -> RpcReply,
{
    let Some(body) = read_request_body(&mut socket).await else {
        return;
    };
    let Ok(request) = serde_json::from_slice::<Value>(&body) else {
        return;
    };

    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();
    log.0.lock().unwrap().push((method.clone(), params.clone()));

    let id = request["id"].clone();
    let response = match handler(&method, &params) {
        RpcReply::Result(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        RpcReply::Error(code, message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": code, "message": message }
        }),
        RpcReply::Delayed(delay, result) => {
            tokio::time::sleep(delay).await;
            json!({ "jsonrpc": "2.0", "id": id, "result": result })
        }
    };

    let body = response.to_string();
    let response_str = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response_str.as_bytes()).await;
    let _ = socket.shutdown().await;
}

async fn read_request_body(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length: usize = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[header_end..header_end + content_length].to_vec())
}
