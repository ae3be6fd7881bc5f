use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// What the mock server does with a request whose line starts with a given prefix.
#[derive(Clone)]
pub enum MockReply {
    /// Answer with a JSON body and the given status line.
    Json(&'static str, String),
    /// Like `Json`, after sleeping first.
    Delayed(std::time::Duration, &'static str, String),
    /// Read the request and never answer.
    Hang,
}

pub fn json_reply(status_line: &'static str, body: serde_json::Value) -> MockReply {
    MockReply::Json(status_line, body.to_string())
}

fn json_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Spawn a mock TCP server routing on the request line (e.g. `"DELETE /task/"`).
/// Unmatched requests get a 404 with an empty body.
/// Returns the base URL and a counter of requests received.
pub fn spawn_mock_server(
    routes: Vec<(&'static str, MockReply)>,
) -> (String, Arc<AtomicUsize>, tokio::sync::oneshot::Sender<()>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();
    let listener = tokio::net::TcpListener::from_std(listener).unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let routes = Arc::new(routes);
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                result = listener.accept() => {
                    if let Ok((mut stream, _)) = result {
                        let routes = routes.clone();
                        let counter = counter.clone();
                        tokio::spawn(async move {
                            let mut buf = [0u8; 8192];
                            let n = stream.read(&mut buf).await.unwrap_or(0);
                            counter.fetch_add(1, Ordering::SeqCst);
                            let request = String::from_utf8_lossy(&buf[..n]).to_string();

                            let reply = routes
                                .iter()
                                .find(|(prefix, _)| request.starts_with(prefix))
                                .map(|(_, reply)| reply.clone());

                            match reply {
                                Some(MockReply::Json(status_line, body)) => {
                                    let _ = stream.write_all(json_response(status_line, &body).as_bytes()).await;
                                }
                                Some(MockReply::Delayed(delay, status_line, body)) => {
                                    tokio::time::sleep(delay).await;
                                    let _ = stream.write_all(json_response(status_line, &body).as_bytes()).await;
                                }
                                Some(MockReply::Hang) => {
                                    tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
                                }
                                None => {
                                    let _ = stream
                                        .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
                                        .await;
                                }
                            }
                        });
                    }
                }
                _ = &mut shutdown_rx => break,
            }
        }
    });

    (format!("http://{}", addr), hits, shutdown_tx)
}

/// A task as the API serializes it.
pub fn task_value(id: uuid::Uuid, title: &str, description: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": description,
        "status": status,
        "createdAt": "2025-06-01T10:00:00Z",
        "updatedAt": "2025-06-01T10:00:00Z"
    })
}
