use std::collections::BTreeMap;

use lazy_static::lazy_static;
use protofile_schema::{Field, Message, Method, Service};
use regex::Regex;
use tracing::warn;

use crate::{
    error::ProtoError,
    types::Diagnostic,
    utils::{quote, split_body, strip_keyword},
};

pub const MESSAGE_KEYWORD:  &str = "message";
pub const SERVICE_KEYWORD:  &str = "service";
pub const SYNTAX_KEYWORD:   &str = "syntax";
pub const RPC_KEYWORD:      &str = "rpc";
pub const REPEATED_KEYWORD: &str = "repeated";
const STREAM_PREFIX:        &str = "stream ";
const RETURNS_SEPARATOR:    &str = " returns ";

lazy_static! {
    static ref SYNTAX_STATEMENT: Regex =
        Regex::new(r#"^syntax\s*=\s*["']([^"']*)["']\s*;?\s*$"#).unwrap();
}

/// Messages known so far, keyed by name.
pub type SymbolTable = BTreeMap<String, Message>;

pub(crate) fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    warn!("{}", diagnostic);
    diagnostics.push(diagnostic);
}

/// Parses `[repeated] type name = number [options...]`, without the trailing `;`.
pub fn parse_field(
    statement:   &str,
    message:     &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Field, ProtoError> {
    let mut words: Vec<&str> = statement.split_whitespace().collect();

    let repeated = words
        .first()
        .map_or(false, |w| w.eq_ignore_ascii_case(REPEATED_KEYWORD));
    if repeated {
        words.remove(0);
    }

    if words.len() < 4 {
        return Err(ProtoError::MalformedField {
            statement: quote(statement),
            reason:    format!("expected \"type name = number\", found {} token(s)", words.len()),
        });
    }

    // words[2] is the "=" and is not checked.
    let (type_name, name, number_text) = (words[0], words[1], words[3]);
    let number = match number_text.parse::<i32>() {
        Ok(number) => number,
        Err(_) => {
            report(
                diagnostics,
                Diagnostic::InvalidFieldNumber {
                    message: message.to_string(),
                    field:   name.to_string(),
                    text:    number_text.to_string(),
                },
            );
            0
        }
    };

    Ok(Field::new(name, type_name, repeated, number))
}

/// Parses `message Name { field; ... }`.
///
/// The body ends at the first `}`; nested braces are not supported.
pub fn parse_message(
    statement:   &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Message, ProtoError> {
    let malformed = |reason: &str| ProtoError::MalformedMessage {
        statement: quote(statement),
        reason:    reason.to_string(),
    };

    let rest = strip_keyword(statement.trim(), MESSAGE_KEYWORD)
        .ok_or_else(|| malformed("expected \"message\" keyword"))?;
    let open = rest.find('{').ok_or_else(|| malformed("missing \"{\""))?;
    let close = rest.find('}').ok_or_else(|| malformed("missing \"}\""))?;
    if close < open {
        return Err(malformed("\"}\" before \"{\""));
    }
    let name = rest[..open]
        .split_whitespace()
        .next()
        .ok_or_else(|| malformed("missing message name"))?;

    let mut fields = BTreeMap::new();
    for part in split_body(&rest[open + 1..close]) {
        let field = parse_field(part, name, diagnostics)?;
        let field_name = field.name().to_string();
        if fields.insert(field_name.clone(), field).is_some() {
            report(
                diagnostics,
                Diagnostic::DuplicateField { message: name.to_string(), field: field_name },
            );
        }
    }

    Ok(Message::new(name, fields))
}

/// Parses `rpc Name ([stream] Req) returns ([stream] Res)`, resolving both
/// types against `table`.
pub fn parse_method(
    statement:   &str,
    service:     &str,
    table:       &SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Method, ProtoError> {
    let malformed = |reason: &str| ProtoError::MalformedMethod {
        statement: quote(statement),
        reason:    reason.to_string(),
    };

    let rest = strip_keyword(statement.trim(), RPC_KEYWORD)
        .ok_or_else(|| malformed("expected \"rpc\" keyword"))?;
    let paren = rest.find('(').ok_or_else(|| malformed("missing \"(\""))?;
    let name = rest[..paren].trim();
    if name.is_empty() {
        return Err(malformed("missing method name"));
    }

    let (request, response) = rest[paren..]
        .split_once(RETURNS_SEPARATOR)
        .ok_or_else(|| malformed("missing \" returns \""))?;
    let (request_streamed, request_type) =
        parse_clause(request).ok_or_else(|| malformed("missing request type"))?;
    let (response_streamed, response_type) =
        parse_clause(response).ok_or_else(|| malformed("missing response type"))?;

    let mut resolve = |type_name: &str| match table.get(type_name) {
        Some(message) => message.clone(),
        None => {
            report(
                diagnostics,
                Diagnostic::UnresolvedType {
                    service:   service.to_string(),
                    method:    name.to_string(),
                    type_name: type_name.to_string(),
                },
            );
            Message::empty(type_name)
        }
    };
    let request = resolve(request_type);
    let response = resolve(response_type);

    Ok(Method::new(name, request, request_streamed, response, response_streamed))
}

/// `( [stream] Type )` -> `(streamed, Type)`.
fn parse_clause(clause: &str) -> Option<(bool, &str)> {
    let clause = clause.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace());
    let (streamed, type_name) = match clause.strip_prefix(STREAM_PREFIX) {
        Some(rest) => (true, rest.trim_start()),
        None       => (false, clause),
    };
    if type_name.is_empty() {
        None
    } else {
        Some((streamed, type_name))
    }
}

/// Parses `service Name { rpc ...; ... }`. Every method is resolved against
/// `table`, which must already hold all messages of the file.
pub fn parse_service(
    statement:   &str,
    table:       &SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Service, ProtoError> {
    let malformed = |reason: &str| ProtoError::MalformedService {
        statement: quote(statement),
        reason:    reason.to_string(),
    };

    let rest = strip_keyword(statement.trim(), SERVICE_KEYWORD)
        .ok_or_else(|| malformed("expected \"service\" keyword"))?;
    let open = rest.find('{').ok_or_else(|| malformed("missing \"{\""))?;
    let name = rest[..open]
        .split_whitespace()
        .next()
        .ok_or_else(|| malformed("missing service name"))?;

    // Unlike messages, the body runs to the end of the statement.
    let body = rest[open..].trim_matches(|c: char| c == '{' || c == '}' || c.is_whitespace());
    let methods = split_body(body)
        .map(|method| parse_method(method, name, table, diagnostics))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Service::new(name, methods))
}

/// Value of a `syntax = "...";` statement, or `None` if it does not match.
pub fn parse_syntax(statement: &str) -> Option<String> {
    SYNTAX_STATEMENT
        .captures(statement.trim())
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        let mut diagnostics = Vec::new();
        let mut table = SymbolTable::new();
        for statement in [
            "message Id { int64 value = 1; }",
            "message Empty {}",
            "message Thing { Id id = 1; string name = 2; repeated string awards = 3; }",
        ] {
            let message = parse_message(statement, &mut diagnostics).unwrap();
            table.insert(message.name().to_string(), message);
        }
        table
    }

    #[test]
    fn test_parse_field() {
        let mut diagnostics = Vec::new();
        let field = parse_field("string name = 2", "Thing", &mut diagnostics).unwrap();
        assert_eq!(field.name(), "name");
        assert_eq!(field.type_name(), "string");
        assert!(!field.is_repeated());
        assert_eq!(field.number(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_repeated_field() {
        let mut diagnostics = Vec::new();
        let field = parse_field("repeated string tag = 3", "Thing", &mut diagnostics).unwrap();
        assert!(field.is_repeated());
        assert_eq!(field.type_name(), "string");
        assert_eq!(field.name(), "tag");
        assert_eq!(field.number(), 3);

        let field = parse_field("REPEATED int32 ids = 4", "Thing", &mut diagnostics).unwrap();
        assert!(field.is_repeated());
        assert_eq!(field.type_name(), "int32");
    }

    #[test]
    fn test_parse_field_ignores_trailing_options() {
        let mut diagnostics = Vec::new();
        let field = parse_field("int32 old = 5 [deprecated = true]", "M", &mut diagnostics).unwrap();
        assert_eq!(field.number(), 5);
    }

    #[test]
    fn test_parse_field_bad_number_defaults_to_zero() {
        let mut diagnostics = Vec::new();
        let field = parse_field("int32 x = one", "M", &mut diagnostics).unwrap();
        assert_eq!(field.number(), 0);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::InvalidFieldNumber {
                message: "M".into(),
                field:   "x".into(),
                text:    "one".into(),
            }]
        );
    }

    #[test]
    fn test_parse_field_too_few_tokens() {
        let mut diagnostics = Vec::new();
        for statement in ["int32 x", "repeated int32 x = ", "int32 x=1", ""] {
            let err = parse_field(statement, "M", &mut diagnostics).unwrap_err();
            assert!(
                matches!(err, ProtoError::MalformedField { .. }),
                "expected a MalformedField but got {:?}",
                err
            );
        }
    }

    #[test]
    fn test_parse_message() {
        let mut diagnostics = Vec::new();
        let message = parse_message(
            "message Thing { Id id = 1; string name = 2; repeated string awards = 3; }",
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(message.name(), "Thing");
        assert_eq!(message.fields().len(), 3);
        assert_eq!(message.field("id").unwrap().type_name(), "Id");
        assert!(message.field("awards").unwrap().is_repeated());
    }

    #[test]
    fn test_parse_empty_message() {
        let mut diagnostics = Vec::new();
        let message = parse_message("message Empty {}", &mut diagnostics).unwrap();
        assert_eq!(message.name(), "Empty");
        assert!(message.fields().is_empty());

        let message = parse_message("message Tight{}", &mut diagnostics).unwrap();
        assert_eq!(message.name(), "Tight");
    }

    #[test]
    fn test_parse_message_duplicate_field_keeps_last() {
        let mut diagnostics = Vec::new();
        let message =
            parse_message("message M { int32 a = 1; string a = 2; }", &mut diagnostics).unwrap();
        assert_eq!(message.fields().len(), 1);
        assert_eq!(message.field("a").unwrap().type_name(), "string");
        assert_eq!(message.field("a").unwrap().number(), 2);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::DuplicateField { message: "M".into(), field: "a".into() }]
        );
    }

    #[test]
    fn test_parse_message_name_not_eaten_by_keyword() {
        let mut diagnostics = Vec::new();
        let message = parse_message("message ageMessage {}", &mut diagnostics).unwrap();
        assert_eq!(message.name(), "ageMessage");
    }

    #[test]
    fn test_parse_malformed_message() {
        let mut diagnostics = Vec::new();
        for statement in ["message Id int64 value = 1;", "message {}", "message A } {", "messageA {}"] {
            let err = parse_message(statement, &mut diagnostics).unwrap_err();
            assert!(
                matches!(err, ProtoError::MalformedMessage { .. }),
                "expected a MalformedMessage but got {:?}",
                err
            );
        }
    }

    #[test]
    fn test_parse_method() {
        let table = table();
        let mut diagnostics = Vec::new();
        let method =
            parse_method("rpc getAll(Empty) returns (stream Thing)", "Test", &table, &mut diagnostics)
                .unwrap();
        assert_eq!(method.name(), "getAll");
        assert_eq!(method.request(), &table["Empty"]);
        assert!(!method.is_request_streamed());
        assert_eq!(method.response(), &table["Thing"]);
        assert!(method.is_response_streamed());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_method_streamed_request() {
        let table = table();
        let mut diagnostics = Vec::new();
        let method = parse_method(
            "rpc upload ( stream Thing ) returns ( Id )",
            "Test",
            &table,
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(method.name(), "upload");
        assert!(method.is_request_streamed());
        assert_eq!(method.request().name(), "Thing");
        assert!(!method.is_response_streamed());
        assert_eq!(method.response().name(), "Id");
    }

    #[test]
    fn test_parse_method_stream_prefix_needs_space() {
        let mut table = table();
        table.insert("streamer".into(), Message::empty("streamer"));
        let mut diagnostics = Vec::new();
        let method =
            parse_method("rpc a(streamer) returns (Id)", "Test", &table, &mut diagnostics).unwrap();
        assert!(!method.is_request_streamed());
        assert_eq!(method.request().name(), "streamer");
    }

    #[test]
    fn test_parse_method_unresolved_type() {
        let table = table();
        let mut diagnostics = Vec::new();
        let method =
            parse_method("rpc find(Query) returns (Id)", "Test", &table, &mut diagnostics).unwrap();
        assert_eq!(method.request(), &Message::empty("Query"));
        assert_eq!(method.response(), &table["Id"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnresolvedType {
                service:   "Test".into(),
                method:    "find".into(),
                type_name: "Query".into(),
            }]
        );
    }

    #[test]
    fn test_parse_malformed_method() {
        let table = table();
        let mut diagnostics = Vec::new();
        for statement in [
            "getAll(Empty) returns (Thing)",
            "rpc getAll Empty returns Thing",
            "rpc (Empty) returns (Thing)",
            "rpc getAll(Empty)",
            "rpc getAll() returns (Thing)",
            "rpc getAll(Empty) returns ( )",
        ] {
            let err = parse_method(statement, "Test", &table, &mut diagnostics).unwrap_err();
            assert!(
                matches!(err, ProtoError::MalformedMethod { .. }),
                "expected a MalformedMethod for {} but got {:?}",
                statement,
                err
            );
        }
    }

    #[test]
    fn test_parse_service() {
        let table = table();
        let mut diagnostics = Vec::new();
        let service = parse_service(
            "service Test {  rpc getAll(Empty) returns (stream Thing);  rpc getOne(Id) returns (Thing);}",
            &table,
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(service.name(), "Test");
        let names: Vec<&str> = service.methods().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["getAll", "getOne"]);
    }

    #[test]
    fn test_parse_empty_service() {
        let mut diagnostics = Vec::new();
        let service = parse_service("service Nothing {}", &SymbolTable::new(), &mut diagnostics).unwrap();
        assert_eq!(service.name(), "Nothing");
        assert!(service.methods().is_empty());
    }

    #[test]
    fn test_parse_malformed_service() {
        let table = table();
        let mut diagnostics = Vec::new();
        for statement in ["service Test rpc a(Id) returns (Id);", "service { rpc a(Id) returns (Id); }"] {
            let err = parse_service(statement, &table, &mut diagnostics).unwrap_err();
            assert!(
                matches!(err, ProtoError::MalformedService { .. }),
                "expected a MalformedService but got {:?}",
                err
            );
        }

        let err = parse_service("service Test { rpc broken; }", &table, &mut diagnostics).unwrap_err();
        assert!(matches!(err, ProtoError::MalformedMethod { .. }));
    }

    #[test]
    fn test_parse_syntax() {
        assert_eq!(parse_syntax("syntax = \"proto3\";"), Some("proto3".to_string()));
        assert_eq!(parse_syntax("  syntax='proto2'"), Some("proto2".to_string()));
        assert_eq!(parse_syntax("syntax proto3;"), None);
    }
}
