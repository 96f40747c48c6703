use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{message} does not contain field {field}")]
    FieldNotFound {
        message: String,
        field:   String,
    },
}
