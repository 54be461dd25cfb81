//! HTTP surface: the status page and the history API.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /`, `GET /index.html` | status page, `text/html` |
//! | `GET /api/history?period=<seconds>` | [`HistorySeries`](hostwatch_types::HistorySeries) as JSON |
//! | anything else | 404 |
//!
//! Metric collection failures never surface as errors here: a page with
//! every value missing is still a 200.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::history::{History, DEFAULT_PERIOD_SECS};
use crate::page::{render_status_page, PageOptions};
use crate::readers::MetricSource;

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// Pause after a failed accept, e.g. when out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Source of incoming connections.
trait Acceptor {
    fn accept_conn(&mut self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send;
}

impl Acceptor for TcpListener {
    fn accept_conn(&mut self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        self.accept()
    }
}

/// Everything a request handler needs, shared by all connections.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub history: Arc<History>,
    pub source: Arc<dyn MetricSource>,
    pub page: Arc<PageOptions>,
}

/// HTTP server for the status page and history API.
#[derive(Debug)]
pub struct StatusServer {
    listen_addr: SocketAddr,
    context: ServerContext,
}

impl StatusServer {
    pub fn new(listen_addr: SocketAddr, context: ServerContext) -> Self {
        Self {
            listen_addr,
            context,
        }
    }

    /// Bind the listener. Separate from [`serve`](Self::serve) so bind
    /// failures surface at startup.
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind(self.listen_addr)
            .await
            .with_context(|| format!("failed to bind {}", self.listen_addr))
    }

    /// Serve connections forever, one task per connection.
    ///
    /// A failed accept is logged and retried after a short pause; it never
    /// stops the server.
    pub async fn serve(self, listener: TcpListener) {
        if let Ok(addr) = listener.local_addr() {
            info!("serving status page at http://{}/", addr);
        }
        self.accept_loop(listener).await
    }

    async fn accept_loop<A: Acceptor + Send>(self, mut acceptor: A) {
        loop {
            let (stream, peer) = match acceptor.accept_conn().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };
            let io = TokioIo::new(stream);
            let context = self.context.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                    let context = context.clone();
                    async move { Ok::<_, std::convert::Infallible>(handle_request(&req, &context)) }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(%peer, error = %e, "connection error");
                }
            });
        }
    }
}

/// Route one request.
pub fn handle_request<B>(req: &Request<B>, context: &ServerContext) -> Response<Full<Bytes>> {
    let path = req.uri().path();

    if req.method() != Method::GET {
        let mut response = respond(StatusCode::METHOD_NOT_ALLOWED, TEXT, "Method Not Allowed");
        response
            .headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET"));
        return response;
    }

    match path {
        "/" | "/index.html" => {
            let overview = context.source.overview();
            let body = render_status_page(&overview, &context.page);
            respond(StatusCode::OK, HTML, body)
        }
        "/api/history" => {
            let period = period_from_query(req.uri().query());
            let series = context.history.query(period);
            match serde_json::to_vec(&series) {
                Ok(body) => respond(StatusCode::OK, JSON, body),
                Err(e) => {
                    error!(error = %e, "failed to encode history");
                    respond(StatusCode::INTERNAL_SERVER_ERROR, TEXT, "Internal Server Error")
                }
            }
        }
        _ => respond(StatusCode::NOT_FOUND, TEXT, "Not Found"),
    }
}

/// The `period` query parameter in seconds, or the 6 hour default when it
/// is missing or not an integer.
pub fn period_from_query(query: Option<&str>) -> i64 {
    query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .find_map(|pair| pair.strip_prefix("period="))
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PERIOD_SECS)
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
