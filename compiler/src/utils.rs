pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Splits a declaration body on `;`, dropping blank segments.
pub fn split_body(body: &str) -> impl Iterator<Item = &str> {
    body.split(';').map(str::trim).filter(|part| !part.is_empty())
}

/// Strips `keyword` from the start of `text` when it stands as a whole word.
pub fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}
