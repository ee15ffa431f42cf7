//! HTTP client for a remote mosaic service.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{ImageryError, ImageryProvider, MosaicHandle, MosaicRequest, Result};

/// Mosaic service client.
///
/// Posts each [`MosaicRequest`] as JSON to `{url}/mosaics`; the service does
/// the compositing and answers with a map id and a tile URL template.
#[derive(Clone)]
pub struct HttpMosaicProvider {
    /// HTTP client
    client: Client,

    /// Service base URL
    url: String,
}

#[derive(Deserialize)]
struct MosaicResponse {
    map_id: String,
    url_format: String,
}

impl HttpMosaicProvider {
    /// Create a new client for the service at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: ClientBuilder::new()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            url: url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Service base URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ImageryProvider for HttpMosaicProvider {
    fn name(&self) -> &str {
        &self.url
    }

    async fn get_mosaic(&self, request: &MosaicRequest) -> Result<MosaicHandle> {
        debug!(
            "Requesting mosaic {} from {} ({}..{})",
            request.label, self.url, request.date_from, request.date_to
        );

        let response = self
            .client
            .post(format!("{}/mosaics", self.url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageryError::Service { status, body });
        }

        let data: MosaicResponse = response.json().await?;
        info!("Mosaic {} ready: {}", request.label, data.map_id);

        Ok(MosaicHandle {
            id: data.map_id,
            label: request.label.clone(),
            date: request.date,
            url_format: Some(data.url_format),
            vis: request.vis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildwatch_core::SiteConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one HTTP request with a canned response, returning the request text.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if request_complete(&received) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).into_owned()
        });

        (url, handle)
    }

    fn request_complete(data: &[u8]) -> bool {
        let text = String::from_utf8_lossy(data);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        data.len() >= header_end + 4 + content_length
    }

    fn request() -> MosaicRequest {
        let config = SiteConfig::default();
        MosaicRequest::for_date("T1", config.reference_date, &config.aoi, &config.imagery).unwrap()
    }

    #[tokio::test]
    async fn test_get_mosaic_success() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"map_id":"maps/abc","url_format":"https://tiles.example/maps/abc/{z}/{x}/{y}"}"#,
        )
        .await;

        let provider = HttpMosaicProvider::new(format!("{}/", url));
        let handle = provider.get_mosaic(&request()).await.unwrap();

        assert_eq!(handle.id, "maps/abc");
        assert_eq!(handle.label, "T1");
        assert_eq!(
            handle.url_format.as_deref(),
            Some("https://tiles.example/maps/abc/{z}/{x}/{y}")
        );

        let received = server.await.unwrap();
        assert!(received.starts_with("POST /mosaics "));
        assert!(received.contains("COPERNICUS/S2_SR_HARMONIZED"));
    }

    #[tokio::test]
    async fn test_get_mosaic_service_error() {
        let (url, server) = serve_once("503 Service Unavailable", "quota exceeded").await;

        let provider = HttpMosaicProvider::new(url);
        let err = provider.get_mosaic(&request()).await.unwrap_err();

        match err {
            ImageryError::Service { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_mosaic_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let provider = HttpMosaicProvider::new(url);
        let err = provider.get_mosaic(&request()).await.unwrap_err();
        assert!(matches!(err, ImageryError::Http(_)));
    }
}
