use thiserror::Error;

/// Top-level error type for the `shellfly-api` crate.
///
/// One taxonomy shared by both device dialects: transport, HTTP status
/// classification, RPC envelopes, decode failures, and generation
/// detection. `shellfly-core` maps these into per-device diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Could not reach the device or the initial identity fetch failed.
    #[error("connection failed: {reason}")]
    ConnectionFailed { reason: String },

    /// HTTP transport error not covered by a more specific kind.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── HTTP status classification ──────────────────────────────────
    /// HTTP 401 — the device wants Basic auth.
    #[error("authentication required")]
    AuthRequired,

    /// HTTP 403.
    #[error("access denied")]
    AccessDenied,

    /// HTTP 404.
    #[error("not found")]
    NotFound,

    /// HTTP 503.
    #[error("unavailable")]
    Unavailable,

    /// HTTP 504 or a deadline expired before the device answered.
    #[error("timeout")]
    Timeout,

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON parse or remarshal failure.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A component index the wire layer rejects outright.
    #[error("invalid component id {id}")]
    InvalidComponentId { id: i64 },

    // ── Gen2 RPC envelope ───────────────────────────────────────────
    /// Structured error returned inside a JSON-RPC response.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    // ── Detection ───────────────────────────────────────────────────
    /// Both generation probes failed; carries both causes.
    #[error("generation detection failed (rpc probe: {gen2_cause}; rest probe: {gen1_cause})")]
    DetectionFailed {
        gen2_cause: Box<Error>,
        gen1_cause: Box<Error>,
    },

    // ── Wrapping ────────────────────────────────────────────────────
    /// An operation-scoped wrapper (`"Switch.Set: ..."`, `"/relay/0: ..."`).
    #[error("{operation}: {source}")]
    Operation {
        operation: String,
        #[source]
        source: Box<Error>,
    },

    /// A component-scoped wrapper (`"switch:0: ..."`).
    #[error("{component}: {source}")]
    Component {
        component: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Classify an HTTP status code. Callers only reach this for non-2xx.
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::AuthRequired,
            403 => Self::AccessDenied,
            404 => Self::NotFound,
            503 => Self::Unavailable,
            504 => Self::Timeout,
            code => Self::HttpStatus(code),
        }
    }

    /// Wrap with the wire operation that failed.
    pub(crate) fn with_operation(self, operation: impl Into<String>) -> Self {
        Self::Operation {
            operation: operation.into(),
            source: Box::new(self),
        }
    }

    /// Wrap with the component the caller addressed (`"switch:0"`).
    pub(crate) fn with_component(self, kind: &str, id: impl std::fmt::Display) -> Self {
        Self::Component {
            component: format!("{kind}:{id}"),
            source: Box::new(self),
        }
    }

    /// Strip operation/component wrappers down to the root cause.
    ///
    /// Lets callers classify by kind without parsing message strings.
    pub fn root(&self) -> &Error {
        match self {
            Self::Operation { source, .. } | Self::Component { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns `true` if this is a transient failure worth retrying.
    pub fn is_transient(&self) -> bool {
        match self.root() {
            Self::Timeout | Self::Unavailable | Self::ConnectionFailed { .. } => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the device rejected or demanded credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self.root(), Self::AuthRequired | Self::AccessDenied)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self.root() {
            Self::NotFound => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Extract the RPC error code, if this wraps a Gen2 envelope error.
    pub fn rpc_code(&self) -> Option<i64> {
        match self.root() {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub(crate) fn decode_error(e: &serde_json::Error, body_preview: &str) -> Error {
    // Byte 200 may fall inside a multi-byte char; keep the whole string
    // rather than panicking on a non-boundary slice.
    let preview = body_preview.get(..200).unwrap_or(body_preview);
    Error::Decode {
        message: format!("{e} (body preview: {preview:?})"),
    }
}
