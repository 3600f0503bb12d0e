// Canned HTTP server for tests that exercise the real reqwest client.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: Vec<u8>,
    /// Send `Content-Length`; without it the body ends when the socket closes.
    pub content_length: bool,
    /// Split the body into this many writes with a pause before each one after the first.
    pub pacing: Option<(usize, Duration)>,
}

impl Route {
    pub fn ok(path: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            path,
            status: 200,
            body: body.into(),
            content_length: true,
            pacing: None,
        }
    }

    pub fn without_length(mut self) -> Self {
        self.content_length = false;
        self
    }

    pub fn paced(mut self, chunks: usize, pause: Duration) -> Self {
        self.pacing = Some((chunks.max(1), pause));
        self
    }
}

/// Serve `routes` on a random local port; unknown paths get a 404.
/// Returns the base URL, e.g. `http://127.0.0.1:40123`.
pub async fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&request);
                let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                let route = routes
                    .iter()
                    .find(|route| route.path == path)
                    .cloned()
                    .unwrap_or_else(|| Route {
                        status: 404,
                        ..Route::ok("", b"not found".to_vec())
                    });

                let mut header = format!(
                    "HTTP/1.1 {} {}\r\n",
                    route.status,
                    if route.status == 200 { "OK" } else { "Error" },
                );
                if route.content_length {
                    header.push_str(&format!("Content-Length: {}\r\n", route.body.len()));
                }
                header.push_str("Connection: close\r\n\r\n");
                if socket.write_all(header.as_bytes()).await.is_err() {
                    return;
                }

                match route.pacing {
                    None => {
                        let _ = socket.write_all(&route.body).await;
                    }
                    Some((chunks, pause)) => {
                        let size = route.body.len().div_ceil(chunks).max(1);
                        for (i, chunk) in route.body.chunks(size).enumerate() {
                            if i > 0 {
                                tokio::time::sleep(pause).await;
                            }
                            if socket.write_all(chunk).await.is_err() {
                                return;
                            }
                            let _ = socket.flush().await;
                        }
                    }
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

/// Client that ignores proxy settings from the environment so requests hit the local server.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
