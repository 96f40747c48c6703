use protofile_schema::LookupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed field {statement}: {reason}")]
    MalformedField {
        statement: String,
        reason:    String,
    },

    #[error("Malformed message {statement}: {reason}")]
    MalformedMessage {
        statement: String,
        reason:    String,
    },

    #[error("Malformed method {statement}: {reason}")]
    MalformedMethod {
        statement: String,
        reason:    String,
    },

    #[error("Malformed service {statement}: {reason}")]
    MalformedService {
        statement: String,
        reason:    String,
    },

    #[error("Invalid number {text} for field {field} in message {message}")]
    InvalidFieldNumber {
        message: String,
        field:   String,
        text:    String,
    },

    #[error("Method {service}.{method} references unknown type {type_name}")]
    UnresolvedTypeReference {
        service:   String,
        method:    String,
        type_name: String,
    },

    #[error("Message {0} is declared more than once")]
    DuplicateMessage(String),

    #[error("Field {field} is declared more than once in message {message}")]
    DuplicateField {
        message: String,
        field:   String,
    },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtoError {
    /// True for errors describing a statement that could not be parsed at all.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ProtoError::MalformedField { .. }
                | ProtoError::MalformedMessage { .. }
                | ProtoError::MalformedMethod { .. }
                | ProtoError::MalformedService { .. }
        )
    }
}
