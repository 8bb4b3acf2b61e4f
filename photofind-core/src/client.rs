use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::conf::{Conf, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::FetchError;
use crate::model::{Image, SearchPage};

pub const IMAGES_PER_PAGE: u32 = 18;

const USER_AGENT: &str = concat!("PhotoFind/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_BODY: usize = 256;

/// The two photo API calls a search session needs.
pub trait PhotoApi {
    fn search_photos(&self, query: &str, page: u32) -> Result<SearchPage, FetchError>;
    fn random_photo(&self) -> Result<Image, FetchError>;
}

impl<T: PhotoApi + ?Sized> PhotoApi for &T {
    fn search_photos(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
        (**self).search_photos(query, page)
    }

    fn random_photo(&self) -> Result<Image, FetchError> {
        (**self).random_photo()
    }
}

/// Blocking Unsplash client.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl UnsplashClient {
    pub fn new(conf: &Conf) -> Self {
        Self::with_base_url(conf.base_url.clone(), conf.api_key.clone()).with_timeout(conf.timeout())
    }

    pub fn with_base_url(base_url: String, api_key: Option<String>) -> Self {
        Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        let url = self.endpoint(path);
        log::debug!("GET {} {:?}", url, params);

        let response = attohttpc::get(&url)
            .params(params)
            .param("client_id", api_key)
            .header("Accept-Version", "v1")
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

impl Default for UnsplashClient {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), None)
    }
}

impl PhotoApi for UnsplashClient {
    fn search_photos(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
        let params = [
            ("query", query.to_string()),
            ("page", page.to_string()),
            ("per_page", IMAGES_PER_PAGE.to_string()),
        ];
        self.get_json("search/photos", &params)
    }

    fn random_photo(&self) -> Result<Image, FetchError> {
        self.get_json("photos/random", &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves a single canned response on a loopback port and reports the request head.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(String::from_utf8_lossy(&buf).to_string()).unwrap();
        });

        (format!("http://{}", addr), rx)
    }

    #[test]
    fn test_search_sends_query_page_and_key() {
        let body = r#"{"total":1,"total_pages":5,"results":[{"id":"a","urls":{"small":"http://img/a"},"alt_description":"cat"}]}"#;
        let (base_url, head) = serve_once("HTTP/1.1 200 OK", body);

        let client = UnsplashClient::with_base_url(base_url, Some("KEY".to_string()));
        let page = client.search_photos("cats", 2).unwrap();
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.results[0].id, "a");

        let head = head.recv().unwrap();
        let request_line = head.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /search/photos?query=cats&page=2&per_page=18&client_id=KEY HTTP/1.1"
        );
        assert!(head.to_lowercase().contains("accept-version: v1"));
    }

    #[test]
    fn test_random_sends_only_key() {
        let body = r#"{"id":"r","urls":{"small":"http://img/r"},"alt_description":null}"#;
        let (base_url, head) = serve_once("HTTP/1.1 200 OK", body);

        let client = UnsplashClient::with_base_url(format!("{}/", base_url), Some("KEY".to_string()));
        let image = client.random_photo().unwrap();
        assert_eq!(image.id, "r");

        let head = head.recv().unwrap();
        assert!(head.starts_with("GET /photos/random?client_id=KEY HTTP/1.1"));
    }

    #[test]
    fn test_non_success_status_is_an_error() {
        let (base_url, _head) = serve_once("HTTP/1.1 401 Unauthorized", r#"{"errors":["OAuth error: The access token is invalid"]}"#);

        let client = UnsplashClient::with_base_url(base_url, Some("bad".to_string()));
        match client.search_photos("cats", 1) {
            Err(FetchError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("access token"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body_is_a_decode_error() {
        let (base_url, _head) = serve_once("HTTP/1.1 200 OK", r#"{"results": "nope"}"#);

        let client = UnsplashClient::with_base_url(base_url, Some("KEY".to_string()));
        assert!(matches!(client.search_photos("cats", 1), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_missing_key_fails_without_request() {
        let client = UnsplashClient::with_base_url("http://127.0.0.1:9".to_string(), None);
        assert!(matches!(client.random_photo(), Err(FetchError::MissingApiKey)));
        assert!(matches!(client.search_photos("cats", 1), Err(FetchError::MissingApiKey)));
    }

    #[test]
    fn test_new_uses_conf_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut conf = Conf::load_from(dir.path()).unwrap();
        conf.base_url = "http://example.test".to_string();
        conf.timeout_secs = 3;

        let client = UnsplashClient::new(&conf);
        assert_eq!(client.base_url(), "http://example.test");
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(client.endpoint("photos/random"), "http://example.test/photos/random");
    }
}
