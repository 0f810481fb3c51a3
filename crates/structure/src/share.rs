//! Client for publishing rendered trees to the structure.sh share service.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Fixed publish endpoint of the hosted share service.
pub const SHARE_ENDPOINT: &str = "https://structure.sh/api/share";

/// Timeout applied to the whole publish request.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// File name attached to the uploaded content part.
const CONTENT_FILE_NAME: &str = "structure.txt";

/// Failure while publishing a rendered tree.
///
/// Publishing is never fatal: callers print the message and continue, the
/// tree has already been rendered.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    /// The HTTP client could not be constructed.
    #[error("failed to build share client: {0}")]
    Client(reqwest::Error),
    /// The multipart request body could not be constructed.
    #[error("failed to build share request: {0}")]
    Request(reqwest::Error),
    /// The request failed in transit, including timeouts.
    #[error("failed to reach share endpoint: {0}")]
    Transport(reqwest::Error),
    /// The endpoint answered with a non-success status.
    #[error("share endpoint returned status {status}: {body}")]
    Status {
        status: StatusCode,
        body: String,
    },
}

/// HTTP client for the share endpoint.
pub struct ShareClient {
    client: Client,
    endpoint: String,
}

impl ShareClient {
    /// Creates a client against the hosted [`SHARE_ENDPOINT`].
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, ShareError> {
        Self::with_endpoint(SHARE_ENDPOINT)
    }

    /// Creates a client against an explicit endpoint.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, ShareError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ShareError::Client)?;

        Ok(Self { client, endpoint: endpoint.into() })
    }

    /// Publishes a plain-text tree and returns the shareable URL verbatim.
    ///
    /// The body is a multipart form with a `project` text field and a
    /// `content` file part (`text/plain`), the exact contract of the share
    /// endpoint. The body is staged in memory, so no temporary resources
    /// outlive the request on any exit path.
    ///
    /// # Errors
    /// Returns an error on request construction failure, transport failure,
    /// or a non-200 response status.
    pub async fn publish(&self, plain_text: &str, project_name: &str) -> Result<String, ShareError> {
        let content = Part::text(plain_text.to_string())
            .file_name(CONTENT_FILE_NAME)
            .mime_str("text/plain")
            .map_err(ShareError::Request)?;
        let form = Form::new()
            .text("project", project_name.to_string())
            .part("content", content);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(ShareError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ShareError::Transport)?;
        if status != StatusCode::OK {
            return Err(ShareError::Status { status, body });
        }

        debug!(url = %body, "published tree");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Accepts one HTTP request, answers with `status_line`/`body`, and
    /// hands back the raw request text.
    async fn spawn_stub(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub listener");
        let endpoint = format!(
            "http://{}/api/share",
            listener.local_addr().expect("failed to read stub address")
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("stub accept failed");
            let mut request = Vec::new();
            let mut buffer = [0_u8; 4096];
            loop {
                let read = socket.read(&mut buffer).await.expect("stub read failed");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("stub write failed");
            socket.shutdown().await.expect("stub shutdown failed");

            String::from_utf8_lossy(&request).into_owned()
        });

        (endpoint, handle)
    }

    /// Returns whether `request` holds the full header block and body.
    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };

        match content_length(&text) {
            Some(expected) => request.len() - (header_end + 4) >= expected,
            None => text.ends_with("0\r\n\r\n"),
        }
    }

    /// Extracts the `content-length` header value, if present.
    fn content_length(text: &str) -> Option<usize> {
        for line in text.lines().take_while(|line| !line.is_empty()) {
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    return value.trim().parse().ok();
                }
            }
        }

        None
    }

    #[tokio::test]
    async fn test_publish_returns_response_body_verbatim() {
        // Arrange
        let (endpoint, handle) = spawn_stub("200 OK", "https://structure.sh/abc-123").await;
        let client = ShareClient::with_endpoint(endpoint).expect("failed to build client");

        // Act
        let url = client
            .publish("project/\n└── README.md", "demo-project")
            .await
            .expect("publish failed");
        let request = handle.await.expect("stub task panicked");

        // Assert
        assert_eq!(url, "https://structure.sh/abc-123");
        assert!(request.contains("name=\"project\""));
        assert!(request.contains("demo-project"));
        assert!(request.contains("name=\"content\""));
        assert!(request.contains("filename=\"structure.txt\""));
        assert!(request.contains("text/plain"));
        assert!(request.contains("project/\n└── README.md"));
    }

    #[tokio::test]
    async fn test_publish_surfaces_non_success_status() {
        // Arrange
        let (endpoint, handle) = spawn_stub("404 NOT FOUND", "unknown endpoint").await;
        let client = ShareClient::with_endpoint(endpoint).expect("failed to build client");

        // Act
        let result = client.publish("project/", "demo-project").await;
        handle.await.expect("stub task panicked");

        // Assert
        assert!(
            matches!(&result, Err(ShareError::Status { .. })),
            "expected status error, got {result:?}"
        );
        if let Err(ShareError::Status { status, body }) = result {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, "unknown endpoint");
        }
    }

    #[tokio::test]
    async fn test_publish_surfaces_transport_failure() {
        // Arrange
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind throwaway listener");
        let endpoint = format!(
            "http://{}/api/share",
            listener.local_addr().expect("failed to read throwaway address")
        );
        drop(listener);
        let client = ShareClient::with_endpoint(endpoint).expect("failed to build client");

        // Act
        let result = client.publish("project/", "demo-project").await;

        // Assert
        assert!(matches!(result, Err(ShareError::Transport(_))));
    }
}
