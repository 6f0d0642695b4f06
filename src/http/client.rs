use super::debug::{
    HttpDebugConfig, redact_header_value, redact_text_body, redact_url, truncate_for_log,
};
use crate::trace::{SessionTrace, TraceKind};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

const DEBUG_PREFIX: &str = "[agent-http]";

/// reqwest wrapper that mirrors every exchange into the session trace and,
/// when verbose, into stderr.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    debug: HttpDebugConfig,
    trace: Option<SessionTrace>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("debug", &self.debug)
            .field("traced", &self.trace.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponseData {
    pub status: u16,
    pub body: String,
}

impl HttpResponseData {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl HttpClient {
    pub fn new(inner: Client, debug: HttpDebugConfig) -> Self {
        Self {
            inner,
            debug,
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: SessionTrace) -> Self {
        self.trace = Some(trace);
        self
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        payload: &T,
    ) -> Result<HttpResponseData, reqwest::Error> {
        let mut builder = self.inner.post(url).json(payload);
        if let Some(token) = bearer_token {
            builder = builder.bearer_auth(token);
        }
        let request = builder.build()?;

        let sent_body = request
            .body()
            .and_then(|body| body.as_bytes())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default();
        self.record(&Exchange {
            head: ExchangeHead::Request {
                method: request.method(),
                url: request.url(),
            },
            headers: request.headers(),
            body: &sent_body,
        });

        let response = self.inner.execute(request).await.inspect_err(|err| {
            if let Some(trace) = &self.trace {
                trace.log_http_error(&err.to_string());
            }
        })?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        self.record(&Exchange {
            head: ExchangeHead::Response { status },
            headers: &headers,
            body: &body,
        });

        Ok(HttpResponseData { status, body })
    }

    fn record(&self, exchange: &Exchange<'_>) {
        let lines = exchange.debug_lines(self.debug);
        if !lines.is_empty() {
            let mut stderr = io::stderr().lock();
            for line in lines {
                let _ = writeln!(stderr, "{line}");
            }
        }

        if let Some(trace) = &self.trace {
            trace.log_http(
                exchange.head.trace_kind(),
                &exchange.head.render(false),
                exchange.headers,
                exchange.body,
            );
        }
    }
}

enum ExchangeHead<'a> {
    Request { method: &'a Method, url: &'a Url },
    Response { status: u16 },
}

impl ExchangeHead<'_> {
    fn marker(&self) -> char {
        match self {
            Self::Request { .. } => '>',
            Self::Response { .. } => '<',
        }
    }

    fn trace_kind(&self) -> TraceKind {
        match self {
            Self::Request { .. } => TraceKind::HttpOut,
            Self::Response { .. } => TraceKind::HttpIn,
        }
    }

    fn render(&self, redact: bool) -> String {
        match self {
            Self::Request { method, url } => format!("{method} {}", redact_url(url, redact)),
            Self::Response { status } => format!("HTTP {status}"),
        }
    }
}

/// One side of an agent call, as it is logged.
struct Exchange<'a> {
    head: ExchangeHead<'a>,
    headers: &'a HeaderMap,
    body: &'a str,
}

impl Exchange<'_> {
    /// Redacted, truncated stderr lines; empty unless verbose.
    fn debug_lines(&self, debug: HttpDebugConfig) -> Vec<String> {
        if !debug.enabled {
            return Vec::new();
        }

        let marker = self.head.marker();
        let mut lines = vec![format!(
            "{DEBUG_PREFIX} {marker} {}",
            self.head.render(debug.redact_secrets)
        )];
        lines.extend(self.headers.iter().map(|(name, value)| {
            format!(
                "{DEBUG_PREFIX} {marker} {name}: {}",
                redact_header_value(name.as_str(), value, debug.redact_secrets)
            )
        }));

        let body = truncate_for_log(
            &redact_text_body(self.body, debug.redact_secrets),
            debug.max_body_chars,
        );
        if body.is_empty() {
            lines.push(format!("{DEBUG_PREFIX} {marker} <empty body>"));
        } else {
            lines.extend(
                body.lines()
                    .map(|line| format!("{DEBUG_PREFIX} {marker} {line}")),
            );
        }
        lines
    }
}
