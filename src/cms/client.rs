//! HTTP client for the content API.
//!
//! # Protocol
//!
//! ```text
//! GET <endpoint>                              -> { "refs": [{ "ref", "isMasterRef" }, ..] }
//! GET <endpoint>/documents/search?ref=&q=     -> { "results": [Document, ..], .. }
//! ```
//!
//! Every search names a content ref. A handle resolves the master ref once,
//! on first use, unless the inbound request carried a preview ref.

use super::{ContentApi, CmsError, Document, Predicate};
use crate::config::CmsConfig;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use tokio::sync::OnceCell;

/// Shared transport; reqwest pools connections internally.
static HTTP: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

// ============================================================================
// Request context
// ============================================================================

/// Request-scoped data forwarded from the inbound HTTP request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    cookies: Vec<(String, String)>,
}

impl RequestContext {
    /// Parse a `Cookie` header (`a=1; b=2`).
    pub fn from_cookie_header(header: &str) -> Self {
        let cookies = header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self { cookies }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Preview ref carried by the `cookie_name` cookie.
    ///
    /// The cookie holds either the ref itself or a JSON object keyed by
    /// repository host whose entries have a `preview` field.
    pub fn preview_ref(&self, cookie_name: &str) -> Option<String> {
        let raw = self.cookie(cookie_name)?;
        let value = urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |v| v.into_owned());
        let value = value.trim();

        if value.starts_with('{') {
            let parsed: serde_json::Value = serde_json::from_str(value).ok()?;
            return parsed.as_object()?.values().find_map(|entry| {
                entry
                    .get("preview")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            });
        }
        (!value.is_empty()).then(|| value.to_string())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    value: String,
    #[serde(rename = "isMasterRef", default)]
    is_master: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Document>,
}

// ============================================================================
// Client
// ============================================================================

/// Handle to the content API, scoped to one inbound request.
#[derive(Debug)]
pub struct CmsClient {
    endpoint: String,
    access_token: Option<String>,
    page_size: Option<u32>,
    content_ref: OnceCell<String>,
}

impl CmsClient {
    /// Build a handle for the configured endpoint, forwarding preview state
    /// from `context` when present.
    pub fn new(config: &CmsConfig, context: Option<&RequestContext>) -> Self {
        let content_ref = context
            .and_then(|ctx| ctx.preview_ref(&config.preview_cookie))
            .map_or_else(OnceCell::new, |preview| OnceCell::new_with(Some(preview)));

        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            page_size: config.page_size,
            content_ref,
        }
    }

    /// URL of the search route.
    fn search_url(&self) -> String {
        format!("{}/documents/search", self.endpoint)
    }

    /// Ref used for searches; resolved from the API root on first call.
    async fn content_ref(&self) -> Result<&str, CmsError> {
        self.content_ref
            .get_or_try_init(|| async {
                let info: ApiInfo = self.get_json(&self.endpoint, &[]).await?;
                info.refs
                    .into_iter()
                    .find(|r| r.is_master)
                    .map(|r| r.value)
                    .ok_or_else(|| CmsError::MissingRef(self.endpoint.clone()))
            })
            .await
            .map(String::as_str)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, CmsError> {
        let mut request = HTTP.get(url).query(params);
        if let Some(token) = &self.access_token {
            request = request.query(&[("access_token", token)]);
        }

        let http_err = |source| CmsError::Http {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.json().await.map_err(http_err)
    }
}

#[async_trait]
impl ContentApi for CmsClient {
    async fn query(&self, predicates: &[Predicate]) -> Result<Vec<Document>, CmsError> {
        let content_ref = self.content_ref().await?.to_string();
        let mut params = vec![
            ("ref", content_ref),
            ("q", Predicate::query_string(predicates)),
        ];
        if let Some(size) = self.page_size {
            params.push(("pageSize", size.to_string()));
        }

        let response: SearchResponse = self.get_json(&self.search_url(), &params).await?;
        Ok(response.results)
    }

    async fn get_by_uid(&self, kind: &str, uid: &str) -> Result<Document, CmsError> {
        self.query(&[Predicate::at(format!("my.{kind}.uid"), uid)])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound {
                kind: kind.to_string(),
                uid: uid.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tiny_http::{Header, Response, Server, StatusCode};

    /// Local content API answering from a routing closure and recording
    /// every request target.
    struct FakeBackend {
        server: Arc<Server>,
        endpoint: String,
        targets: Arc<Mutex<Vec<String>>>,
    }

    impl FakeBackend {
        fn start(route: impl Fn(&str) -> (u16, String) + Send + 'static) -> Self {
            let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
            let addr = server.server_addr().to_ip().unwrap();
            let targets = Arc::new(Mutex::new(Vec::new()));

            let (incoming, seen) = (Arc::clone(&server), Arc::clone(&targets));
            std::thread::spawn(move || {
                for request in incoming.incoming_requests() {
                    let target = request.url().to_string();
                    seen.lock().push(target.clone());
                    let (status, body) = route(target.split('?').next().unwrap_or_default());
                    let json = Header::from_bytes("Content-Type", "application/json").unwrap();
                    let response = Response::from_string(body)
                        .with_status_code(StatusCode(status))
                        .with_header(json);
                    let _ = request.respond(response);
                }
            });

            Self {
                server,
                endpoint: format!("http://{addr}/api"),
                targets,
            }
        }

        fn targets(&self) -> Vec<String> {
            self.targets.lock().clone()
        }

        fn config(&self) -> CmsConfig {
            CmsConfig {
                endpoint: self.endpoint.clone(),
                ..CmsConfig::default()
            }
        }
    }

    impl Drop for FakeBackend {
        fn drop(&mut self) {
            self.server.unblock();
        }
    }

    const REFS: &str = r#"{"refs":[
        {"id":"preview","ref":"OLD","isMasterRef":false},
        {"id":"master","ref":"MASTER","isMasterRef":true}
    ]}"#;

    fn results(documents: &str) -> String {
        format!(r#"{{"page":1,"results_size":1,"results":[{documents}]}}"#)
    }

    const PRODUCT: &str = r#"{"id":"P1","uid":"wireless-mouse","type":"product","data":{}}"#;

    /// Decoded value of query parameter `name` in a request target.
    fn param(target: &str, name: &str) -> Option<String> {
        target
            .split_once('?')?
            .1
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| {
                urlencoding::decode(&value.replace('+', " "))
                    .unwrap()
                    .into_owned()
            })
    }

    fn path(target: &str) -> &str {
        target.split('?').next().unwrap_or_default()
    }

    fn catalog_backend() -> FakeBackend {
        FakeBackend::start(|path| match path {
            "/api" => (200, REFS.to_string()),
            "/api/documents/search" => (200, results(PRODUCT)),
            _ => (404, "{}".to_string()),
        })
    }

    #[tokio::test]
    async fn test_query_resolves_master_ref_once() {
        let backend = catalog_backend();
        let client = CmsClient::new(&backend.config(), None);

        let documents = client
            .query(&[Predicate::document_type("product")])
            .await
            .unwrap();
        client.query(&[Predicate::document_type("category")]).await.unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].slug(), "wireless-mouse");

        let targets = backend.targets();
        assert_eq!(targets.len(), 3);
        assert_eq!(path(&targets[0]), "/api");
        assert_eq!(path(&targets[1]), "/api/documents/search");
        assert_eq!(param(&targets[1], "ref").as_deref(), Some("MASTER"));
        assert_eq!(
            param(&targets[1], "q").as_deref(),
            Some(r#"[[at(document.type, "product")]]"#)
        );
        assert_eq!(param(&targets[2], "ref").as_deref(), Some("MASTER"));
        assert_eq!(param(&targets[1], "pageSize"), None);
        assert_eq!(param(&targets[1], "access_token"), None);
    }

    #[tokio::test]
    async fn test_query_sends_page_size_and_token() {
        let backend = catalog_backend();
        let config = CmsConfig {
            access_token: Some("secret token".into()),
            page_size: Some(100),
            ..backend.config()
        };
        let client = CmsClient::new(&config, None);
        client.query(&[Predicate::document_type("product")]).await.unwrap();

        let targets = backend.targets();
        assert_eq!(param(&targets[0], "access_token").as_deref(), Some("secret token"));
        assert_eq!(param(&targets[1], "access_token").as_deref(), Some("secret token"));
        assert_eq!(param(&targets[1], "pageSize").as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn test_missing_master_ref() {
        let backend = FakeBackend::start(|_| {
            (200, r#"{"refs":[{"ref":"OLD","isMasterRef":false}]}"#.to_string())
        });
        let client = CmsClient::new(&backend.config(), None);

        let err = client.query(&[]).await.unwrap_err();
        assert!(matches!(err, CmsError::MissingRef(ref endpoint) if *endpoint == backend.endpoint));
        assert_eq!(backend.targets().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let backend = FakeBackend::start(|path| match path {
            "/api" => (200, REFS.to_string()),
            _ => (503, r#"{"message":"unavailable"}"#.to_string()),
        });
        let client = CmsClient::new(&backend.config(), None);

        let err = client.query(&[]).await.unwrap_err();
        match err {
            CmsError::Status { url, status } => {
                assert_eq!(status, 503);
                assert!(url.ends_with("/api/documents/search"));
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_by_uid() {
        let backend = catalog_backend();
        let client = CmsClient::new(&backend.config(), None);

        let document = client.get_by_uid("product", "wireless-mouse").await.unwrap();
        assert_eq!(document.id, "P1");
        assert_eq!(
            param(&backend.targets()[1], "q").as_deref(),
            Some(r#"[[at(my.product.uid, "wireless-mouse")]]"#)
        );
    }

    #[tokio::test]
    async fn test_get_by_uid_empty_results_is_not_found() {
        let backend = FakeBackend::start(|path| match path {
            "/api" => (200, REFS.to_string()),
            _ => (200, r#"{"results":[]}"#.to_string()),
        });
        let client = CmsClient::new(&backend.config(), None);

        let err = client.get_by_uid("category", "chairs").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("chairs"));
    }

    #[tokio::test]
    async fn test_preview_ref_is_sent_without_ref_lookup() {
        let backend = catalog_backend();
        let context = RequestContext::from_cookie_header("io.prismic.preview=PREVIEW");
        let client = CmsClient::new(&backend.config(), Some(&context));
        client.query(&[Predicate::document_type("product")]).await.unwrap();

        let targets = backend.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(param(&targets[0], "ref").as_deref(), Some("PREVIEW"));
    }

    #[test]
    fn test_cookie_header_parsing() {
        let ctx = RequestContext::from_cookie_header("a=1; io.prismic.preview=abc ; =x; junk");
        assert_eq!(ctx.cookie("a"), Some("1"));
        assert_eq!(ctx.cookie("io.prismic.preview"), Some("abc"));
        assert_eq!(ctx.cookie("junk"), None);
    }

    #[test]
    fn test_preview_ref_plain() {
        let ctx = RequestContext::from_cookie_header("io.prismic.preview=WQ1x~preview");
        assert_eq!(
            ctx.preview_ref("io.prismic.preview").as_deref(),
            Some("WQ1x~preview")
        );
    }

    #[test]
    fn test_preview_ref_json_encoded() {
        let cookie = urlencoding::encode(
            r#"{"devcommerce9.prismic.io":{"preview":"https://devcommerce9.prismic.io/previews/X"}}"#,
        );
        let ctx = RequestContext::from_cookie_header(&format!("io.prismic.preview={cookie}"));
        assert_eq!(
            ctx.preview_ref("io.prismic.preview").as_deref(),
            Some("https://devcommerce9.prismic.io/previews/X")
        );
    }

    #[test]
    fn test_preview_ref_absent_or_empty() {
        assert_eq!(RequestContext::default().preview_ref("io.prismic.preview"), None);
        let ctx = RequestContext::from_cookie_header("io.prismic.preview=");
        assert_eq!(ctx.preview_ref("io.prismic.preview"), None);
    }

    #[tokio::test]
    async fn test_preview_ref_skips_ref_lookup() {
        let ctx = RequestContext::from_cookie_header("io.prismic.preview=PREVIEW");
        let client = CmsClient::new(&CmsConfig::default(), Some(&ctx));

        // Resolved without touching the network
        assert_eq!(client.content_ref().await.unwrap(), "PREVIEW");
    }

    #[test]
    fn test_search_url_trims_slash() {
        let config = CmsConfig {
            endpoint: "https://shop.cdn.prismic.io/api/v2/".into(),
            ..CmsConfig::default()
        };
        let client = CmsClient::new(&config, None);
        assert_eq!(
            client.search_url(),
            "https://shop.cdn.prismic.io/api/v2/documents/search"
        );
    }
}
