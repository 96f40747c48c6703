/// One top-level declaration, with any multi-line body folded onto one line.
#[derive(Debug, PartialEq)]
pub struct Statement {
    pub text: String,
    /// Line on which the statement starts, 1-based.
    pub line: usize,
}

/// Splits file content into top-level statements.
///
/// A line break ends the current statement only outside a `{ ... }` body.
/// Line breaks are never kept in the statement text, and nothing is trimmed.
pub fn segment_statements(text: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut current    = String::new();
    let mut depth      = 0usize;
    let mut line       = 1;
    let mut start_line = 1;

    for ch in text.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '\n' => {
                if depth == 0 && !current.is_empty() {
                    statements.push(Statement {
                        text: std::mem::take(&mut current),
                        line: start_line,
                    });
                }
                line += 1;
                continue;
            }
            _ => {}
        }
        if current.is_empty() {
            start_line = line;
        }
        current.push(ch);
    }

    // Input without a trailing newline still ends its last statement.
    if !current.is_empty() {
        statements.push(Statement { text: current, line: start_line });
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        segment_statements(input).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_segment_single_lines() {
        let input = "message Id { int64 value = 1; }\nmessage Empty {}\n";
        assert_eq!(texts(input), vec!["message Id { int64 value = 1; }", "message Empty {}"]);
    }

    #[test]
    fn test_segment_folds_body_lines() {
        let input = "service Test {\n  rpc a(X) returns (Y);\n  rpc b(X) returns (Y);\n}\n";
        assert_eq!(
            texts(input),
            vec!["service Test {  rpc a(X) returns (Y);  rpc b(X) returns (Y);}"]
        );
    }

    #[test]
    fn test_segment_discards_blank_lines() {
        let input = "\n\nmessage A {}\n\n\nmessage B {}\n\n";
        assert_eq!(texts(input), vec!["message A {}", "message B {}"]);
    }

    #[test]
    fn test_segment_keeps_whitespace_only_lines() {
        // Not trimmed here; the builder ignores them.
        assert_eq!(texts("  \nmessage A {}"), vec!["  ", "message A {}"]);
    }

    #[test]
    fn test_segment_trailing_text_after_close() {
        let input = "message A {\n int32 x = 1;\n} trailing\nmessage B {}";
        assert_eq!(texts(input), vec!["message A { int32 x = 1;} trailing", "message B {}"]);
    }

    #[test]
    fn test_segment_nested_braces_stay_together() {
        let input = "message A {\n {\n }\n int32 x = 1;\n}\n";
        assert_eq!(texts(input), vec!["message A { { } int32 x = 1;}"]);
    }

    #[test]
    fn test_segment_stray_close_brace() {
        assert_eq!(texts("}\nmessage A {}\n"), vec!["}", "message A {}"]);
    }

    #[test]
    fn test_segment_start_lines() {
        let got = segment_statements("syntax = \"proto3\";\n\nservice S {\n rpc a(X) returns (Y);\n}\nmessage X {}\n");
        let lines: Vec<usize> = got.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 3, 6]);
    }
}
