//! Storefront HTTP server.
//!
//! Built on `tiny_http`, with page loaders running on a tokio runtime:
//!
//! - Static files from `[build] public` (favicon, robots.txt)
//! - Per-request pages (home, search, add-to-cart) rendered on every hit
//! - Static pages (category, product) served from the [`PageCache`] and
//!   regenerated in the background once stale
//! - Unknown static paths answered with a loading placeholder while the
//!   page is generated
//! - Graceful shutdown on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐  spawn   ┌──────────────────────────┐
//! │   Main Thread   │ ───────► │      tokio runtime       │
//! │ (accept loop)   │          │ render_reply(route)      │
//! └─────────────────┘          │   ├── render_route       │
//!                              │   └── spawn regeneration │
//!                              └────────────┬─────────────┘
//!                                           ▼
//!                                       PageCache
//! ```

use crate::{
    cache::{CachedPage, Lookup, PageCache},
    cms::{CmsClient, ContentApi, RequestContext},
    config::{SiteConfig, cfg},
    generator::sitemap::{Sitemap, UrlEntry},
    log,
    pages::{
        RefreshPolicy,
        cart::{CartViewLoader, StubCartView},
        error::{is_not_found, render_failure, render_not_found},
        fallback, render_route, static_paths,
    },
    routes::Route,
};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    net::SocketAddr,
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Builds a content API handle for one request.
type Connect = dyn Fn(Option<&RequestContext>) -> Arc<dyn ContentApi> + Send + Sync;

/// State shared by every request.
pub struct AppState {
    pub cache: PageCache,
    cart: Arc<dyn CartViewLoader>,
    connect: Box<Connect>,
}

impl AppState {
    /// State backed by the configured CMS.
    pub fn new() -> Self {
        Self::with_api(Box::new(
            |context: Option<&RequestContext>| -> Arc<dyn ContentApi> {
                Arc::new(CmsClient::new(&cfg().cms, context))
            },
        ))
    }

    fn with_api(connect: Box<Connect>) -> Self {
        Self {
            cache: PageCache::new(),
            cart: Arc::new(StubCartView),
            connect,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the storefront server.
///
/// This function:
/// 1. Starts the tokio runtime and pre-renders category pages (if enabled)
/// 2. Binds to the configured interface and port (with auto-retry on port conflict)
/// 3. Sets up Ctrl+C handler for graceful shutdown
/// 4. Enters the main request loop, handing each request to the runtime
///
/// The server blocks until Ctrl+C is received.
pub fn serve_site() -> Result<()> {
    let c = cfg();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let state = Arc::new(AppState::new());

    if c.serve.prerender {
        runtime.block_on(prerender(&state, &c));
    }

    let interface: std::net::IpAddr = c.serve.interface.parse()?;
    let (server, addr) = try_bind_port(interface, c.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        let state = Arc::clone(&state);
        runtime.spawn(async move {
            let target = request.url().to_string();
            if let Err(e) = handle_request(request, &state).await {
                log!("error"; "{target}: {e:#}");
            }
        });
    }

    Ok(())
}

/// Render every statically known page into the cache.
///
/// Failures are logged and leave the page to on-demand generation.
async fn prerender(state: &AppState, config: &SiteConfig) {
    let api = (state.connect)(None);
    let paths = match static_paths(api.as_ref()).await {
        Ok(paths) => paths,
        Err(e) => {
            log!("error"; "listing static paths: {e:#}");
            return;
        }
    };

    for path in &paths {
        let Some(route) = Route::parse(path) else {
            continue;
        };
        if let Err(e) = generate(state, &route, path, config).await {
            log!("error"; "{path}: {e:#}");
        }
    }
    log!("cache"; "pre-rendered {}/{} pages", state.cache.len(), paths.len());
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// What to send back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    etag: Option<String>,
    no_store: bool,
}

impl Reply {
    fn html(status: u16, html: String) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8",
            body: html.into_bytes(),
            etag: None,
            no_store: false,
        }
    }

    /// A cached page, or `304` when the client already holds it.
    fn page(page: &CachedPage, if_none_match: Option<&str>) -> Self {
        let (status, html) = if if_none_match.is_some_and(|tag| page.matches(tag)) {
            (304, String::new())
        } else {
            (200, page.html.clone())
        };
        Self {
            etag: Some(page.etag.clone()),
            ..Self::html(status, html)
        }
    }
}

/// Handle a single HTTP request.
///
/// Resolution order:
/// 1. Non-GET/HEAD → 405
/// 2. File under `[build] public` → serve file
/// 3. Storefront route → page (cached or per request)
/// 4. Nothing found → 404 page
async fn handle_request(request: Request, state: &Arc<AppState>) -> Result<()> {
    let config = cfg();

    if !matches!(request.method(), Method::Get | Method::Head) {
        return respond(request, Reply::html(405, "405 Method Not Allowed".into()));
    }

    if let Some(path) = resolve_static(&config.build.public, request.url()) {
        return serve_file(request, &path);
    }

    let context = header(&request, "Cookie")
        .map(RequestContext::from_cookie_header)
        .unwrap_or_default();
    let if_none_match = header(&request, "If-None-Match").map(str::to_string);

    let reply = match Route::parse(request.url()) {
        Some(route) => {
            render_reply(state, route, &context, if_none_match.as_deref(), &config).await?
        }
        None => Reply::html(404, render_not_found(&config)?),
    };
    respond(request, reply)
}

/// Produce the reply for a parsed route.
async fn render_reply(
    state: &Arc<AppState>,
    route: Route,
    context: &RequestContext,
    if_none_match: Option<&str>,
    config: &SiteConfig,
) -> Result<Reply> {
    if route == Route::Sitemap {
        let sitemap = sitemap_from_cache(&state.cache, config);
        return Ok(Reply {
            content_type: "application/xml; charset=utf-8",
            body: sitemap.to_xml(config),
            ..Reply::html(200, String::new())
        });
    }

    let preview = context.preview_ref(&config.cms.preview_cookie).is_some();
    if let (RefreshPolicy::Revalidate { ttl }, Some(key), false) = (
        RefreshPolicy::for_route(&route, config),
        route.static_key(),
        preview,
    ) {
        return match state.cache.lookup(&key, ttl) {
            Lookup::Fresh(page) => Ok(Reply::page(&page, if_none_match)),
            Lookup::Stale(page) => {
                spawn_regeneration(state, route, key);
                Ok(Reply::page(&page, if_none_match))
            }
            Lookup::NotFound { stale } => {
                if stale {
                    spawn_regeneration(state, route, key);
                }
                Ok(Reply::html(404, render_not_found(config)?))
            }
            Lookup::Missing => {
                spawn_regeneration(state, route, key);
                Ok(Reply {
                    no_store: true,
                    ..Reply::html(200, fallback::render(config)?)
                })
            }
        };
    }

    let api = (state.connect)(Some(context));
    match render_route(&route, api.as_ref(), state.cart.as_ref(), config).await {
        Ok(html) => Ok(Reply::html(200, html)),
        Err(e) if is_not_found(&e) => Ok(Reply::html(404, render_not_found(config)?)),
        Err(e) => {
            log!("error"; "{}: {:#}", route.href(), e);
            Ok(Reply::html(500, render_failure(config)?))
        }
    }
}

/// Regenerate `key` in the background unless a regeneration is in flight.
fn spawn_regeneration(state: &Arc<AppState>, route: Route, key: String) {
    if !state.cache.try_claim(&key) {
        return;
    }

    let state = Arc::clone(state);
    tokio::spawn(async move {
        let config = cfg();
        if let Err(e) = generate(&state, &route, &key, &config).await {
            log!("error"; "{key}: {e:#}");
        }
        state.cache.release(&key);
    });
}

/// Render `route` into the cache under `key`.
///
/// A missing document is remembered as not found; any other failure leaves
/// the previous entry untouched.
async fn generate(state: &AppState, route: &Route, key: &str, config: &SiteConfig) -> Result<()> {
    let api = (state.connect)(None);
    match render_route(route, api.as_ref(), state.cart.as_ref(), config).await {
        Ok(html) => {
            state.cache.insert(key, html);
            log!("cache"; "generated {key}");
        }
        Err(e) if is_not_found(&e) => {
            state.cache.insert_not_found(key);
            log!("cache"; "{key} not found");
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Sitemap of the home page plus every cached page.
fn sitemap_from_cache(cache: &PageCache, config: &SiteConfig) -> Sitemap {
    let mut urls = vec![UrlEntry::new(config, "/", None)];
    urls.extend(
        cache
            .pages()
            .into_iter()
            .map(|(path, page)| UrlEntry::new(config, &path, Some(page.rendered_at))),
    );
    Sitemap::new(urls)
}

// ============================================================================
// Response Helpers
// ============================================================================

fn header<'a>(request: &'a Request, name: &'static str) -> Option<&'a str> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str())
}

fn make_header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|()| anyhow!("invalid header {name}: {value}"))
}

fn respond(request: Request, reply: Reply) -> Result<()> {
    let mut response = Response::from_data(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(make_header("Content-Type", reply.content_type)?);
    if let Some(etag) = &reply.etag {
        response = response.with_header(make_header("ETag", etag)?);
    }
    if reply.no_store {
        response = response.with_header(make_header("Cache-Control", "no-store")?);
    }

    request.respond(response)?;
    Ok(())
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let reply = Reply {
        content_type: guess_content_type(path),
        body: content,
        ..Reply::html(200, String::new())
    };
    respond(request, reply)
}

/// Map a request target to an existing file under `public`.
///
/// Only plain path segments are accepted; `..` and absolute parts never
/// escape the directory.
fn resolve_static(public: &Path, target: &str) -> Option<PathBuf> {
    let path = target.split('?').next().unwrap_or(target);
    let decoded = urlencoding::decode(path).ok()?;
    let relative = Path::new(decoded.trim_start_matches('/'));

    if relative.as_os_str().is_empty()
        || !relative
            .components()
            .all(|part| matches!(part, Component::Normal(_)))
    {
        return None;
    }

    let local = public.join(relative);
    local.is_file().then_some(local)
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json" | "webmanifest") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",

        _ => "application/octet-stream",
    }
}
