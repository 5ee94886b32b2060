use poem::{http::StatusCode, Endpoint, IntoResponse, Middleware, Request, Response};
use std::time::Instant;

/// Middleware that logs every request with its query string, status and latency
pub struct RequestLogging;

impl<E: Endpoint> Middleware<E> for RequestLogging {
    type Output = RequestLoggingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RequestLoggingEndpoint { inner: ep }
    }
}

pub struct RequestLoggingEndpoint<E> {
    inner: E,
}

struct RequestSummary {
    method: String,
    path: String,
    query: String,
    client_ip: String,
    started: Instant,
}

impl RequestSummary {
    fn from_request(req: &Request) -> Self {
        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().unwrap_or_default().to_string(),
            client_ip: req
                .remote_addr()
                .as_socket_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            started: Instant::now(),
        }
    }

    fn record(&self, status: StatusCode) {
        let duration_ms = self.started.elapsed().as_millis();
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(
                method = %self.method,
                path = %self.path,
                query = %self.query,
                status = status.as_u16(),
                duration_ms = %duration_ms,
                client_ip = %self.client_ip,
                "request failed"
            );
        } else {
            tracing::info!(
                method = %self.method,
                path = %self.path,
                query = %self.query,
                status = status.as_u16(),
                duration_ms = %duration_ms,
                client_ip = %self.client_ip,
                "request completed"
            );
        }
    }
}

impl<E: Endpoint> Endpoint for RequestLoggingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        let summary = RequestSummary::from_request(&req);

        match self.inner.call(req).await {
            Ok(resp) => {
                let resp = resp.into_response();
                summary.record(resp.status());
                Ok(resp)
            }
            Err(err) => {
                // Handler errors still carry a status; only log at error level for 5xx
                let status = err.status();
                if status.is_server_error() {
                    tracing::error!(
                        method = %summary.method,
                        path = %summary.path,
                        status = status.as_u16(),
                        error = %err,
                        "request error"
                    );
                } else {
                    summary.record(status);
                }
                Err(err)
            }
        }
    }
}
