//! The proxy engine: matches a path against the provider registry, injects
//! a credential, and streams the upstream response back unchanged.

use agentauth_registry::{ProviderDescriptor, match_path_segment};
use agentauth_types::{AgentAuthError, AuthStyle};
use axum::{
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{Stream, TryStreamExt as _};
use secrecy::ExposeSecret as _;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;

use crate::error::ApiError;
use crate::logger;
use crate::state::AppState;

/// Local cap on the captured request body. 32 MiB comfortably covers any
/// realistic chat-completion payload while still bounding memory use.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// `fallback` handler for the router: matches the first path segment
/// against the provider registry, or responds `404`.
pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    axum::extract::ConnectInfo(remote): axum::extract::ConnectInfo<SocketAddr>,
    req: Request<Body>,
) -> Response {
    let start = Instant::now();
    let remote_ip = remote.ip();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let Some(descriptor) = first_segment(&path).and_then(match_path_segment) else {
        logger::log_error(remote_ip, method.as_str(), &path, "not found");
        return ApiError(AgentAuthError::NotFound).into_response();
    };

    match run(&state, descriptor, remote_ip, &method, &path, start, req).await {
        Ok((response, _model)) => response,
        Err(err) => {
            logger::log_error(remote_ip, method.as_str(), &path, &err.0.to_string());
            err.into_response()
        }
    }
}

/// Strips the leading `/` and returns the first path segment, if any.
fn first_segment(path: &str) -> Option<&str> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.split('/').next().unwrap_or(trimmed))
}

/// Strips the matched provider's segment off the front of `path`, leaving
/// the remainder to forward to the upstream (including its own leading
/// `/`, or empty).
fn strip_provider_segment<'a>(path: &'a str, provider_segment: &str) -> &'a str {
    let trimmed = path.trim_start_matches('/');
    trimmed.strip_prefix(provider_segment).unwrap_or(trimmed)
}

/// Runs steps 3–10 of the pipeline for a single proxied request. On success
/// returns the response to send to the client alongside the best-effort
/// model name for the terminal log line.
///
/// `pub(crate)` rather than private: the end-to-end scenario tests below
/// call this directly against a `ProviderDescriptor` pointed at a
/// `wiremock` server, since the real registry's `upstream_base`s are
/// compile-time constants with no room to swap in a test double.
pub(crate) async fn run(
    state: &Arc<AppState>,
    descriptor: &'static ProviderDescriptor,
    remote_ip: IpAddr,
    method: &Method,
    path: &str,
    start: Instant,
    req: Request<Body>,
) -> Result<(Response, Option<String>), ApiError> {
    let (parts, body) = req.into_parts();

    // Step 3: capture the full body before any credential is touched.
    let body_bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError(AgentAuthError::BodyTooLarge))?;

    // Step 4: best-effort model extraction for logging only.
    let model = logger::extract_model(&body_bytes);

    // Step 5: apply the provider's sanitizer, if any.
    let body_bytes = apply_sanitizer(descriptor, &body_bytes);

    // Step 6: exactly one credential read, after body capture.
    let credential = state
        .secrets
        .read(descriptor.id.as_str())
        .await
        .map_err(ApiError)?;

    // Step 7: build upstream headers.
    let upstream_headers = build_upstream_headers(descriptor, &parts.headers, &credential);

    // Step 1/8: compose the upstream URL and issue the request.
    let remainder = strip_provider_segment(path, descriptor.id.as_str());
    let mut url = format!("{}{}", descriptor.upstream_base, remainder);
    if let Some(q) = parts.uri.query() {
        url.push('?');
        url.push_str(q);
    }

    // `reqwest::Method` and `axum::http::Method` are both the `http` crate's
    // type, so the incoming method carries over unchanged.
    let mut builder = state.http.request(method.clone(), &url).headers(upstream_headers);
    if !matches!(*method, Method::GET | Method::HEAD) {
        builder = builder.body(body_bytes);
    }

    let upstream_resp = builder
        .send()
        .await
        .map_err(|e| ApiError(AgentAuthError::Upstream(e.to_string())))?;

    // Step 9: stream the response back, headers filtered. Step 10: the
    // terminal log line is deferred until the body stream actually ends, so
    // a slow or long-lived SSE stream logs the real total duration rather
    // than the duration of the upstream header round-trip.
    let log = PendingLog {
        remote_ip,
        method: method.as_str().to_string(),
        path: path.to_string(),
        model: model.clone(),
        status: upstream_resp.status().as_u16(),
        start,
    };
    Ok((stream_response(upstream_resp, log), model))
}

/// What the terminal log line needs, captured at the point the upstream
/// response headers arrive and fired once the body has fully drained.
struct PendingLog {
    remote_ip: IpAddr,
    method: String,
    path: String,
    model: Option<String>,
    status: u16,
    start: Instant,
}

impl PendingLog {
    fn fire(self) {
        logger::log_admitted(
            self.remote_ip,
            &self.method,
            &self.path,
            self.model.as_deref(),
            self.status,
            self.start.elapsed(),
        );
    }
}

/// Wraps `inner` so that `log.fire()` runs exactly once, right after the
/// last item has been yielded — i.e. when the client (or our own
/// `to_bytes` in tests) has drained the whole response body.
fn log_on_complete<S>(
    inner: S,
    log: PendingLog,
) -> impl Stream<Item = Result<bytes::Bytes, std::io::Error>> + Send + 'static
where
    S: Stream<Item = Result<bytes::Bytes, std::io::Error>> + Send + 'static,
{
    let mut inner = Box::pin(inner);
    let mut log = Some(log);
    futures_util::stream::poll_fn(move |cx| match inner.as_mut().poll_next(cx) {
        std::task::Poll::Ready(Some(item)) => std::task::Poll::Ready(Some(item)),
        std::task::Poll::Ready(None) => {
            if let Some(log) = log.take() {
                log.fire();
            }
            std::task::Poll::Ready(None)
        }
        std::task::Poll::Pending => std::task::Poll::Pending,
    })
}

/// Strips `context_management` from an Anthropic body. No-op for every
/// other provider and for bodies that aren't a JSON object.
fn apply_sanitizer(descriptor: &ProviderDescriptor, body: &bytes::Bytes) -> bytes::Bytes {
    let Some(sanitizer) = descriptor.sanitizer else {
        return body.clone();
    };
    let Ok(mut value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return body.clone();
    };
    sanitizer(&mut value);
    serde_json::to_vec(&value).map_or_else(|_| body.clone(), bytes::Bytes::from)
}

/// Builds the header set sent upstream: never copies `host`,
/// `authorization`, or `x-api-key` from the caller — only `content-type`,
/// the registry's `passthrough_headers`, its `default_headers` for
/// anything the caller omitted, and the freshly injected credential.
fn build_upstream_headers(
    descriptor: &ProviderDescriptor,
    client_headers: &HeaderMap,
    credential: &secrecy::SecretString,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(ct) = client_headers.get(axum::http::header::CONTENT_TYPE) {
        headers.insert(axum::http::header::CONTENT_TYPE, ct.clone());
    }

    for name in descriptor.passthrough_headers {
        if let Some(value) = client_headers.get(*name) {
            if let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) {
                headers.insert(header_name, value.clone());
            }
        }
    }

    for (name, value) in descriptor.default_headers {
        if client_headers.get(*name).is_none() {
            if let (Ok(header_name), Ok(header_value)) =
                (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value))
            {
                headers.insert(header_name, header_value);
            }
        }
    }

    let secret = credential.expose_secret();
    match descriptor.auth_style {
        AuthStyle::Bearer => {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {secret}")) {
                headers.insert(axum::http::header::AUTHORIZATION, value);
            }
        }
        AuthStyle::XApiKey => {
            if let Ok(value) = HeaderValue::from_str(secret) {
                headers.insert(HeaderName::from_static("x-api-key"), value);
            }
        }
        AuthStyle::XGoogApiKey => {
            if let Ok(value) = HeaderValue::from_str(secret) {
                headers.insert(HeaderName::from_static("x-goog-api-key"), value);
            }
        }
    }

    headers
}

/// Copies the upstream status and headers (minus `content-encoding` and
/// `transfer-encoding`) and pipes the body as a stream — never buffer the
/// full response, which would defeat server-sent-event passthrough. The
/// stream is wrapped so `log`'s terminal log line fires once the body has
/// actually finished draining, not when these headers arrive.
fn stream_response(upstream: reqwest::Response, log: PendingLog) -> Response {
    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);

    for (name, value) in upstream.headers() {
        if name.as_str().eq_ignore_ascii_case("content-encoding")
            || name.as_str().eq_ignore_ascii_case("transfer-encoding")
        {
            continue;
        }
        builder = builder.header(name, value);
    }

    let stream = upstream.bytes_stream().map_err(std::io::Error::other);
    builder
        .body(Body::from_stream(log_on_complete(stream, log)))
        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
}
