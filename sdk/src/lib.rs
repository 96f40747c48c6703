//! protofile
//!
//! Entry point for reading `.proto` files into a queryable model.
//!
//! - `open` / `open_with` (path based) and `parse` (text based)
//! - `to_json` for dumping a model
//! - re-exports of the model (`protofile-schema`) and compiler types

use std::path::Path;

pub use protofile_compiler::{
    compile_proto, compile_proto_file, parse_proto, Diagnostic, ParseOptions, ProtoError,
    Strictness,
};
pub use protofile_schema::{Field, LookupError, Message, Method, ProtoFile, Service};

/// Read the `.proto` file at `path` with default (lenient) options.
pub fn open(path: impl AsRef<Path>) -> Result<ProtoFile, ProtoError> {
    open_with(path, &ParseOptions::default()).map(|(file, _)| file)
}

/// Read the `.proto` file at `path`, returning the model and its diagnostics.
pub fn open_with(
    path:    impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<(ProtoFile, Vec<Diagnostic>), ProtoError> {
    compile_proto_file(path, options)
}

/// Parse `.proto` text with default (lenient) options.
pub fn parse(text: &str) -> Result<ProtoFile, ProtoError> {
    parse_proto(text, &ParseOptions::default())
}

/// Render a model as pretty-printed JSON.
pub fn to_json(file: &ProtoFile) -> Result<String, ProtoError> {
    Ok(serde_json::to_string_pretty(file)?)
}

pub mod error {
    pub use protofile_compiler::error::ProtoError;
    pub use protofile_schema::LookupError;
}

pub mod schema {
    pub use protofile_schema::{Field, Message, Method, ProtoFile, Service};
}
