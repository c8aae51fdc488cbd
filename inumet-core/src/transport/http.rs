use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{InumetError, Result};

use super::{Transport, truncate_body};

const USER_AGENT: &str = concat!("inumet-core/", env!("CARGO_PKG_VERSION"));

/// `reqwest`-backed transport used against the live service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { http })
    }

    /// Wrap an already configured client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        tracing::debug!(%url, "GET");

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!(%url, %status, "request failed");
            return Err(InumetError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP server answering successive connections with `responses`.
    async fn serve(responses: Vec<(u16, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();

                let mut request: Vec<u8> = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == &b"\r\n\r\n"[..]) {
                    let n = socket.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                }

                let response = format!(
                    "HTTP/1.1 {status} Status\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{addr}/reportes/x.json")
    }

    #[test]
    fn client_creation() {
        assert!(HttpTransport::new(30).is_ok());
    }

    #[test]
    fn user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("inumet-core/"));
    }

    #[tokio::test]
    async fn server_error_keeps_status_and_truncated_body() {
        let url = serve(vec![(500, "x".repeat(300))]).await;
        let transport = HttpTransport::new(5).unwrap();

        let err = transport.get_json(&url).await.unwrap_err();
        match err {
            InumetError::Api { status, url: failed, body } => {
                assert_eq!(status, 500);
                assert_eq!(failed, url);
                assert_eq!(body.chars().count(), 203);
                assert!(body.ends_with("..."));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_json_error() {
        let url = serve(vec![(200, "<html>mantenimiento</html>".to_string())]).await;
        let transport = HttpTransport::new(5).unwrap();

        let err = transport.get_json(&url).await.unwrap_err();
        assert!(matches!(err, InumetError::Json(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn wrapped_client_decodes_json() {
        let url = serve(vec![(200, r#"{"estaciones":[]}"#.to_string())]).await;
        let transport = HttpTransport::with_client(Client::builder().no_proxy().build().unwrap());

        let doc = transport.get_json(&url).await.unwrap();
        assert_eq!(doc, serde_json::json!({ "estaciones": [] }));
    }
}
