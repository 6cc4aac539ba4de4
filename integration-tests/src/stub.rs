use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server that answers exactly one request with a canned response.
pub struct StubServer {
    /// Root to hand to `OsuClient::with_base_url`.
    pub base_url: String,
    request: JoinHandle<Result<String, String>>,
}

impl StubServer {
    /// Start listening on an ephemeral local port.
    pub async fn start(status: u16, body: &str) -> Result<Self, String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| format!("Failed to bind stub: {e}"))?;
        let addr = listener
            .local_addr()
            .map_err(|e| format!("Failed to read stub address: {e}"))?;

        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason(status),
            body.len(),
            body
        );

        let request = tokio::spawn(async move {
            let (mut socket, _) = listener
                .accept()
                .await
                .map_err(|e| format!("Stub accept failed: {e}"))?;

            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket
                    .read(&mut buf)
                    .await
                    .map_err(|e| format!("Stub read failed: {e}"))?;
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            socket
                .write_all(response.as_bytes())
                .await
                .map_err(|e| format!("Stub write failed: {e}"))?;
            socket
                .shutdown()
                .await
                .map_err(|e| format!("Stub shutdown failed: {e}"))?;

            let text = String::from_utf8_lossy(&head);
            Ok(text.lines().next().unwrap_or_default().to_string())
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            request,
        })
    }

    /// Request line the stub received, e.g. `GET /api/get_match?k=x&mp=1 HTTP/1.1`.
    pub async fn request_line(self) -> Result<String, String> {
        self.request
            .await
            .map_err(|e| format!("Stub task failed: {e}"))?
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}
