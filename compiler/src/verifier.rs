use crate::{
    error::ProtoError,
    types::{Diagnostic, Strictness},
};

/// Returns `Ok(())` when the diagnostics are acceptable under `strictness`,
/// or the error for the first diagnostic otherwise.
pub fn verify_diagnostics(diagnostics: &[Diagnostic], strictness: Strictness) -> Result<(), ProtoError> {
    if strictness == Strictness::Lenient {
        return Ok(());
    }
    match diagnostics.iter().find_map(to_error) {
        Some(err) => Err(err),
        None      => Ok(()),
    }
}

fn to_error(diagnostic: &Diagnostic) -> Option<ProtoError> {
    let err = match diagnostic.clone() {
        Diagnostic::UnresolvedType { service, method, type_name } => {
            ProtoError::UnresolvedTypeReference { service, method, type_name }
        }
        Diagnostic::InvalidFieldNumber { message, field, text } => {
            ProtoError::InvalidFieldNumber { message, field, text }
        }
        Diagnostic::DuplicateMessage { name } => ProtoError::DuplicateMessage(name),
        Diagnostic::DuplicateField { message, field } => ProtoError::DuplicateField { message, field },
        // Statements are only skipped in lenient builds.
        Diagnostic::SkippedStatement { .. } => return None,
    };
    Some(err)
}
