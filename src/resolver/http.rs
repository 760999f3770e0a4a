use crate::config::ResolverSettings;
use crate::error::ResolveError;
use crate::resolver::{PageParser, Resolver};
use crate::types::PersonRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// HTTP resolver backed by the Mathematics Genealogy Project web pages
pub struct GenealogyClient {
    client: Client,
    base_url: String,
    parser: PageParser,
}

impl GenealogyClient {
    /// Create a new client from resolver settings
    pub fn new(settings: &ResolverSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")?;

        let parser = PageParser::new().context("Failed to compile record page patterns")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            parser,
        })
    }

    /// URL of the page describing one person
    pub fn record_url(&self, id: u64) -> String {
        format!("{}/id.php?id={}", self.base_url, id)
    }
}

#[async_trait]
impl Resolver for GenealogyClient {
    async fn resolve(&self, id: u64) -> Result<PersonRecord, ResolveError> {
        info!("Grabbing record #{}", id);

        let url = self.record_url(id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ResolveError::UnknownId(id));
        }
        if !status.is_success() {
            return Err(ResolveError::Status {
                id,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);

        self.parser.parse(id, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    const GAUSS_PAGE: &str = r#"<html><body>
<h2 style="text-align: center; margin-bottom: 0.5ex; margin-top: 1ex">
Carl Friedrich Gau&szlig;	</h2>
<span style="margin-right: 0.5em">Ph.D. <span style="color:
  #006633; margin-left: 0.5em">Universit&auml;t Helmstedt</span> 1799</span>
<p>Advisor: <a href="id.php?id=18230">Johann Friedrich Pfaff</a></p>
<table>
<tr ><td><a href="id.php?id=18603">Christoph Gudermann</a></td></tr>
<tr ><td><a href="id.php?id=18233">Richard Dedekind</a></td></tr>
</table>
</body></html>
"#;

    /// Serve one canned HTTP response on a local port. Yields the base URL
    /// and a receiver for the request line the client sent.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (request_tx, request_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let read = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..read]);
            let request_line = request.lines().next().unwrap_or_default().to_string();
            let _ = request_tx.send(request_line);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        (format!("http://{}", addr), request_rx)
    }

    fn settings(base_url: &str) -> ResolverSettings {
        ResolverSettings {
            base_url: base_url.to_string(),
            ..ResolverSettings::default()
        }
    }

    #[test]
    fn test_record_url() {
        let client = GenealogyClient::new(&settings("https://www.mathgenealogy.org")).unwrap();
        assert_eq!(
            client.record_url(18231),
            "https://www.mathgenealogy.org/id.php?id=18231"
        );
    }

    #[test]
    fn test_record_url_trims_trailing_slash() {
        let client = GenealogyClient::new(&settings("http://localhost:8080/")).unwrap();
        assert_eq!(client.record_url(7), "http://localhost:8080/id.php?id=7");
    }

    #[tokio::test]
    async fn test_resolve_parses_person_page() {
        let (base_url, request) = serve_once("200 OK", GAUSS_PAGE).await;
        let client = GenealogyClient::new(&settings(&base_url)).unwrap();

        let record = client.resolve(18231).await.unwrap();
        assert_eq!(record.name, "Carl Friedrich Gau\u{df}");
        assert_eq!(record.institution.as_deref(), Some("Universit\u{e4}t Helmstedt"));
        assert_eq!(record.year, Some(1799));
        assert_eq!(record.ancestor_ids, vec![18230]);
        assert_eq!(record.descendant_ids, vec![18603, 18233]);

        assert_eq!(request.await.unwrap(), "GET /id.php?id=18231 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_resolve_not_found_is_unknown_id() {
        let (base_url, _request) = serve_once("404 Not Found", "").await;
        let client = GenealogyClient::new(&settings(&base_url)).unwrap();

        let err = client.resolve(5).await.unwrap_err();
        assert!(matches!(err, ResolveError::UnknownId(5)));
    }

    #[tokio::test]
    async fn test_resolve_server_error_is_status() {
        let (base_url, _request) = serve_once("503 Service Unavailable", "busy").await;
        let client = GenealogyClient::new(&settings(&base_url)).unwrap();

        let err = client.resolve(6).await.unwrap_err();
        assert!(matches!(err, ResolveError::Status { id: 6, status: 503 }));
    }

    #[tokio::test]
    async fn test_resolve_unknown_marker_page() {
        let (base_url, _request) = serve_once(
            "200 OK",
            "<html><body><p>You have specified an ID that does not exist in the database. Please back up and try again.</p></body></html>",
        )
        .await;
        let client = GenealogyClient::new(&settings(&base_url)).unwrap();

        let err = client.resolve(999999999).await.unwrap_err();
        assert!(matches!(err, ResolveError::UnknownId(999999999)));
    }
}
