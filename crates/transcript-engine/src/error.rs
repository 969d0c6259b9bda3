//! Error taxonomy for a single result lookup.
//!
//! Every failure the engine can produce is one variant of [`EngineError`].
//! Transport and parse code classify low-level failures at the point they
//! happen, so callers only ever match on this closed set.

use serde::Serialize;

/// How the calling layer should treat a failure.
///
/// `Warning` means the request was well-formed but the data does not exist
/// or arrived too slowly. `Error` means something systemic went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// All terminal outcomes of a failed lookup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("SSL issue detected, website certificate invalid")]
    Certificate,

    #[error("Website took too long to respond")]
    Timeout,

    #[error("Unable to reach university website")]
    Unreachable,

    #[error("No result found for this registration number")]
    NoResultTable,

    #[error("Invalid registration number, student not found")]
    InvalidRegistration,

    #[error("Registration number is required")]
    MissingRegistration,

    #[error("Malformed response from university website")]
    MalformedResponse(String),

    #[error("Unexpected error occurred")]
    Unclassified(String),
}

impl EngineError {
    /// Severity of this failure.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Timeout
            | Self::NoResultTable
            | Self::InvalidRegistration
            | Self::MissingRegistration => Severity::Warning,
            Self::Certificate
            | Self::Unreachable
            | Self::MalformedResponse(_)
            | Self::Unclassified(_) => Severity::Error,
        }
    }

    /// Raw diagnostic text. Only unexpected failures carry it.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::MalformedResponse(d) | Self::Unclassified(d) => Some(d.as_str()),
            _ => None,
        }
    }

    /// Stable machine-readable name of the variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Certificate => "certificate",
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::NoResultTable => "no_result_table",
            Self::InvalidRegistration => "invalid_registration",
            Self::MissingRegistration => "missing_registration",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Unclassified(_) => "unclassified",
        }
    }

    /// Build the wire-level failure report.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            success: false,
            kind: self.severity(),
            message: self.to_string(),
            details: self.details().map(String::from),
        }
    }

    /// Classify a navigation failure from its message text.
    ///
    /// Browser engines only surface navigation failures as strings
    /// (`net::ERR_CERT_AUTHORITY_INVALID`, `Request timed out`, ...).
    pub fn from_navigation_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("err_cert") || lower.contains("certificate") || lower.contains("ssl") {
            Self::Certificate
        } else if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else {
            Self::Unreachable
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        // The top-level message carries the request URL, so only the
        // underlying causes are inspected.
        if is_certificate_failure(std::error::Error::source(&err)) {
            return Self::Certificate;
        }
        if err.is_connect() || err.is_redirect() || err.is_request() {
            return Self::Unreachable;
        }
        if err.is_body() || err.is_decode() {
            return Self::MalformedResponse(err.to_string());
        }
        Self::Unclassified(err.to_string())
    }
}

/// Walk a source chain looking for a certificate complaint.
fn is_certificate_failure(mut current: Option<&(dyn std::error::Error + 'static)>) -> bool {
    while let Some(e) = current {
        if is_certificate_message(&e.to_string()) {
            return true;
        }
        current = e.source();
    }
    false
}

/// Certificate wording used by rustls (`invalid peer certificate:
/// UnknownIssuer`, `NotValidForName`, ...). Other TLS failures such as a
/// handshake EOF do not match.
fn is_certificate_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["certificate", "unknownissuer", "notvalidforname", "badsignature"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// `{ success: false, type, message, details? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub success: bool,
    #[serde(rename = "type")]
    pub kind: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
