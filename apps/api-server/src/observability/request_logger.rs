//! Request logging middleware.
//!
//! Assigns every request an ID, logs method, path and body inside a span
//! carrying that ID, and echoes the ID back in the response headers.

use actix_http::BoxedPayloadStream;
use actix_web::{
    Error, HttpMessage,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    error::PayloadError,
    http::header::{HeaderName, HeaderValue},
    web::{Bytes, BytesMut},
};
use futures::future::LocalBoxFuture;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::future::{Ready, ready};
use std::rc::Rc;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub static REQUEST_ID_HEADER: &str = "X-Request-ID";

const MAX_LOGGED_BODY: usize = 1024;
const REDACTED_FIELDS: &[&str] = &["password"];

/// Middleware that logs each request and tags it with a unique ID.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestLoggerService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        // Check if request already has an ID (from client or load balancer)
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );

        Box::pin(
            async move {
                match tap_body(&mut req, MAX_LOGGED_BODY).await {
                    BodyTap::Complete(body) => {
                        tracing::info!(body = %loggable_body(&body), "Incoming request")
                    }
                    BodyTap::Truncated(read) => {
                        tracing::info!(bytes_read = read, "Incoming request (body too long to log)")
                    }
                    BodyTap::Failed(error) => {
                        tracing::warn!(%error, "Incoming request (body unreadable)")
                    }
                }

                let mut res = service.call(req).await?;

                tracing::info!(status = res.status().as_u16(), "Request completed");

                res.headers_mut().insert(
                    HeaderName::from_static("x-request-id"),
                    HeaderValue::from_str(&request_id)
                        .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
                );

                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// What the logger saw of a request body.
#[derive(Debug)]
enum BodyTap {
    Complete(Bytes),
    /// More than the logging limit; holds the number of bytes read so far.
    Truncated(usize),
    Failed(String),
}

/// Read at most a little over `limit` bytes of the body, then give the request
/// a payload that replays them ahead of whatever was left unread. Read errors
/// are replayed too, so the handler sees the body exactly as the client sent it.
async fn tap_body(req: &mut ServiceRequest, limit: usize) -> BodyTap {
    let mut rest = req.take_payload();
    let mut head = BytesMut::new();
    let mut failure = None;
    let mut finished = false;

    while head.len() <= limit {
        match rest.next().await {
            Some(Ok(chunk)) => head.extend_from_slice(&chunk),
            Some(Err(err)) => {
                failure = Some(err);
                break;
            }
            None => {
                finished = true;
                break;
            }
        }
    }

    let head = head.freeze();
    let tap = match (&failure, finished) {
        (Some(err), _) => BodyTap::Failed(err.to_string()),
        (None, true) => BodyTap::Complete(head.clone()),
        (None, false) => BodyTap::Truncated(head.len()),
    };

    let replayed = stream::once(ready(Ok::<_, PayloadError>(head)));
    let payload: BoxedPayloadStream = match failure {
        Some(err) => Box::pin(replayed.chain(stream::once(ready(Err(err))))),
        None if finished => Box::pin(replayed),
        None => Box::pin(replayed.chain(rest)),
    };
    req.set_payload(Payload::Stream { payload });

    tap
}

/// Render a body for the log with credentials masked and length capped.
fn loggable_body(body: &[u8]) -> String {
    if body.is_empty() {
        return "{}".to_string();
    }

    let rendered = match serde_json::from_slice::<Value>(body) {
        Ok(mut json) => {
            redact(&mut json);
            json.to_string()
        }
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    };

    if rendered.len() > MAX_LOGGED_BODY {
        let mut end = MAX_LOGGED_BODY;
        while !rendered.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} bytes)", &rendered[..end], body.len())
    } else {
        rendered
    }
}

fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = Value::String("[redacted]".to_string());
                } else {
                    redact(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_password_is_redacted() {
        let logged = loggable_body(br#"{"username":"root","password":"sekret"}"#);

        assert!(logged.contains("root"));
        assert!(logged.contains("[redacted]"));
        assert!(!logged.contains("sekret"));
    }

    #[test]
    fn test_non_json_body_logged_verbatim() {
        assert_eq!(loggable_body(b"hello"), "hello");
        assert_eq!(loggable_body(b""), "{}");
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "x".repeat(MAX_LOGGED_BODY * 2);

        let logged = loggable_body(body.as_bytes());

        assert!(logged.len() < body.len());
        assert!(logged.ends_with(&format!("({} bytes)", body.len())));
    }

    #[actix_web::test]
    async fn test_short_body_is_logged_and_replayed() {
        let body = r#"{"title":"React patterns"}"#;
        let mut req = TestRequest::default().set_payload(body).to_srv_request();

        let tap = tap_body(&mut req, MAX_LOGGED_BODY).await;

        assert!(matches!(tap, BodyTap::Complete(ref seen) if seen == body.as_bytes()));
        let replayed = req.extract::<Bytes>().await.unwrap();
        assert_eq!(replayed, body.as_bytes());
    }

    #[actix_web::test]
    async fn test_long_body_is_replayed_intact() {
        let body = format!(r#"{{"url":"https://example.com/{}"}}"#, "y".repeat(MAX_LOGGED_BODY * 4));
        let mut req = TestRequest::default().set_payload(body.clone()).to_srv_request();

        let tap = tap_body(&mut req, MAX_LOGGED_BODY).await;

        assert!(matches!(tap, BodyTap::Truncated(read) if read > MAX_LOGGED_BODY));
        let replayed = req.extract::<Bytes>().await.unwrap();
        assert_eq!(replayed, body.as_bytes());
    }

    #[actix_web::test]
    async fn test_empty_body_is_complete() {
        let mut req = TestRequest::get().to_srv_request();

        let tap = tap_body(&mut req, MAX_LOGGED_BODY).await;

        assert!(matches!(tap, BodyTap::Complete(ref seen) if seen.is_empty()));
    }
}
