// Server module - HTTP/1.1 adapter in front of the watermark handler
//
// Maps `GET /{imageKey}` onto an `ApiRequest`, runs the handler, and turns
// the `ApiResponse` back into an HTTP response with a binary body.

use bytes::Bytes;
use http::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

use crate::constants::{CONTENT_TYPE_TEXT, INTERNAL_ERROR_BODY, METHOD_NOT_ALLOWED_BODY};
use crate::handler::{ApiRequest, ApiResponse, WatermarkHandler};

/// Listening HTTP server bound to a socket
pub struct WatermarkServer {
    listener: TcpListener,
    handler: Arc<WatermarkHandler>,
}

impl WatermarkServer {
    /// Bind the listener. Port 0 picks an ephemeral port.
    pub async fn bind(addr: SocketAddr, handler: Arc<WatermarkHandler>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, handler })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` resolves.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!(address = %self.local_addr()?, "Watermark server listening");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to accept connection");
                            continue;
                        }
                    };
                    let handler = Arc::clone(&self.handler);
                    tokio::spawn(serve_connection(stream, peer, handler));
                }
            }
        }
    }
}

async fn serve_connection(
    stream: tokio::net::TcpStream,
    peer: SocketAddr,
    handler: Arc<WatermarkHandler>,
) {
    let service = service_fn(move |request| {
        let handler = Arc::clone(&handler);
        async move { Ok::<_, Infallible>(route(&handler, request).await) }
    });

    if let Err(e) = http1::Builder::new()
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
    }
}

/// Route one HTTP request through the handler.
///
/// The request body is ignored. Only `GET` and `HEAD` are accepted.
pub async fn route<B>(handler: &WatermarkHandler, request: Request<B>) -> Response<Full<Bytes>> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let method = request.method().clone();
        if method != Method::GET && method != Method::HEAD {
            tracing::debug!("Rejecting unsupported method");
            return method_not_allowed();
        }

        let key = image_key_from_path(request.uri().path());
        let response = handler.handle(&ApiRequest::with_image_key(key)).await;
        into_http_response(&response, method == Method::HEAD)
    }
    .instrument(span)
    .await
}

/// Image key from a request path: leading `/` removed, percent-decoded.
///
/// Undecodable paths yield an empty key, which the handler reports as 404.
pub fn image_key_from_path(path: &str) -> String {
    let raw = path.strip_prefix('/').unwrap_or(path);
    match urlencoding::decode(raw) {
        Ok(key) => key.into_owned(),
        Err(e) => {
            tracing::debug!(path, error = %e, "Path is not valid UTF-8 after decoding");
            String::new()
        }
    }
}

/// Convert a handler response into an HTTP response.
///
/// Base64 bodies are decoded back to binary. `head_only` keeps the headers
/// and content length but drops the body.
pub fn into_http_response(response: &ApiResponse, head_only: bool) -> Response<Full<Bytes>> {
    let body = match response.body_bytes() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Response body is not valid base64");
            return internal_server_error();
        }
    };

    let mut builder = Response::builder()
        .status(response.status_code)
        .header(CONTENT_LENGTH, body.len());
    for (name, value) in &response.headers {
        builder = builder.header(name, value);
    }

    let body = if head_only {
        Bytes::new()
    } else {
        Bytes::from(body)
    };

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP response");
        internal_server_error()
    })
}

fn method_not_allowed() -> Response<Full<Bytes>> {
    let mut response = text_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY);
    response
        .headers_mut()
        .insert(ALLOW, http::HeaderValue::from_static("GET, HEAD"));
    response
}

fn internal_server_error() -> Response<Full<Bytes>> {
    text_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
}

fn text_response(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, http::HeaderValue::from_static(CONTENT_TYPE_TEXT));
    response
}
