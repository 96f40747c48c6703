use std::fmt;

use serde::Serialize;

use crate::utils::quote;

/// How anomalies that still leave a usable model are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Strictness {
    /// Substitute defaults, log a warning and record a [`Diagnostic`].
    #[default]
    Lenient,
    /// Fail the build on the first anomaly.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub strictness: Strictness,
    /// Skip malformed statements instead of aborting the build.
    pub recover:    bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions { strictness: Strictness::Strict, ..Default::default() }
    }

    pub fn recovering() -> Self {
        ParseOptions { recover: true, ..Default::default() }
    }
}

/// Something the compiler noticed but did not treat as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    UnresolvedType {
        service:   String,
        method:    String,
        type_name: String,
    },
    InvalidFieldNumber {
        message: String,
        field:   String,
        text:    String,
    },
    DuplicateMessage {
        name: String,
    },
    DuplicateField {
        message: String,
        field:   String,
    },
    SkippedStatement {
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedType { service, method, type_name } => write!(
                f,
                "method {}.{} references unknown type {}",
                service,
                method,
                quote(type_name)
            ),
            Diagnostic::InvalidFieldNumber { message, field, text } => write!(
                f,
                "field {}.{} has invalid number {}, using 0",
                message,
                field,
                quote(text)
            ),
            Diagnostic::DuplicateMessage { name } => {
                write!(f, "message {} redeclared, keeping the last declaration", name)
            }
            Diagnostic::DuplicateField { message, field } => write!(
                f,
                "field {} redeclared in message {}, keeping the last declaration",
                field, message
            ),
            Diagnostic::SkippedStatement { reason } => write!(f, "skipped statement: {}", reason),
        }
    }
}
