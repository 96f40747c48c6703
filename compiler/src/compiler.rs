use std::fs;
use std::path::Path;

use protofile_schema::ProtoFile;
use tracing::debug;

use crate::{
    error::ProtoError,
    parser::{
        parse_message, parse_service, parse_syntax, report, SymbolTable, MESSAGE_KEYWORD,
        SERVICE_KEYWORD, SYNTAX_KEYWORD,
    },
    segmenter::{segment_statements, Statement},
    types::{Diagnostic, ParseOptions, Strictness},
    utils::quote,
    verifier::verify_diagnostics,
};

/// Compile `.proto` text into a `ProtoFile` plus the diagnostics noticed on the way.
///
/// Every message is registered before any service is parsed, so a method may
/// name a message declared later in the file.
pub fn compile_proto(
    text:    &str,
    options: &ParseOptions,
) -> Result<(ProtoFile, Vec<Diagnostic>), ProtoError> {
    let statements = segment_statements(text);
    debug!("segmented {} statement(s)", statements.len());

    let mut diagnostics = Vec::new();
    let mut syntax      = None;
    let mut table       = SymbolTable::new();
    let mut deferred    = Vec::new();

    // Pass 1: messages, and note the services for later.
    for statement in &statements {
        let text = statement.text.trim_start();
        if text.starts_with(SERVICE_KEYWORD) {
            deferred.push(statement);
        } else if text.starts_with(MESSAGE_KEYWORD) {
            let parsed = parse_message(text, &mut diagnostics);
            if let Some(message) = recover(parsed, statement, options, &mut diagnostics)? {
                let name = message.name().to_string();
                if table.insert(name.clone(), message).is_some() {
                    report(&mut diagnostics, Diagnostic::DuplicateMessage { name });
                }
            }
        } else if text.starts_with(SYNTAX_KEYWORD) {
            match parse_syntax(text) {
                Some(value) => syntax = Some(value),
                None => debug!("line {}: ignoring syntax statement {}", statement.line, quote(text)),
            }
        } else if !text.is_empty() {
            debug!("line {}: ignoring statement {}", statement.line, quote(text));
        }
    }
    debug!("registered {} message(s)", table.len());

    // Pass 2: services, against the complete table.
    let mut services = Vec::with_capacity(deferred.len());
    for statement in deferred {
        let parsed = parse_service(statement.text.trim_start(), &table, &mut diagnostics);
        if let Some(service) = recover(parsed, statement, options, &mut diagnostics)? {
            services.push(service);
        }
    }
    debug!("parsed {} service(s)", services.len());

    verify_diagnostics(&diagnostics, options.strictness)?;
    Ok((ProtoFile::new(syntax, services, table), diagnostics))
}

/// Like [`compile_proto`], dropping the diagnostics.
pub fn parse_proto(text: &str, options: &ParseOptions) -> Result<ProtoFile, ProtoError> {
    compile_proto(text, options).map(|(file, _)| file)
}

/// Read and compile the `.proto` file at `path`.
pub fn compile_proto_file(
    path:    impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<(ProtoFile, Vec<Diagnostic>), ProtoError> {
    let path = path.as_ref();
    debug!("reading {}", path.display());
    let text = fs::read_to_string(path)?;
    compile_proto(&text, options)
}

/// Turns a malformed statement into a skipped-statement diagnostic when the
/// options ask for recovery.
fn recover<T>(
    result:      Result<T, ProtoError>,
    statement:   &Statement,
    options:     &ParseOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<T>, ProtoError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if options.recover && options.strictness == Strictness::Lenient && err.is_malformed() => {
            report(
                diagnostics,
                Diagnostic::SkippedStatement { reason: format!("line {}: {}", statement.line, err) },
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
