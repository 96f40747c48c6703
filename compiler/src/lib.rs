//! protofile-compiler
//!
//! This crate implements:
//!  1) A statement segmenter for `.proto` text (`segment_statements`),
//!  2) Grammar parsers for fields, messages, methods and services,
//!  3) The two-pass model builder (`compile_proto` → `ProtoFile`),
//!  4) Lenient/strict handling of non-fatal anomalies (`Diagnostic`),
//!  5) Error types (`ProtoError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod segmenter;
pub mod parser;
pub mod verifier;
pub mod compiler;

pub use compiler::compile_proto;
pub use compiler::compile_proto_file;
pub use compiler::parse_proto;
pub use error::ProtoError;
pub use types::{Diagnostic, ParseOptions, Strictness};
