use crate::ir::Architecture;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(?:```|~~~)[ \t]*(?i:json5?)?[ \t]*\r?\n(?P<body>.*?)\r?\n[ \t]*(?:```|~~~)")
        .unwrap()
});

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("input does not contain an architecture document")]
    Empty,
    #[error("invalid architecture document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid architecture document (JSON5): {0}")]
    Json5(#[from] json5::Error),
}

/// Locates the document inside collaborator text: the text itself when it opens
/// with an object (cut at its last closing brace), else the first fenced block,
/// else the outermost braces.
pub fn extract_document(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        let end = trimmed.rfind('}').map_or(trimmed.len(), |end| end + 1);
        return Some(&trimmed[..end]);
    }
    if let Some(body) = FENCED_BLOCK_RE
        .captures(trimmed)
        .and_then(|caps| caps.name("body"))
    {
        let body = body.as_str().trim();
        return (!body.is_empty()).then_some(body);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

/// Parses an architecture from strict JSON, falling back to JSON5 when the text
/// is not syntactically valid JSON. Schema errors are reported as they are.
pub fn parse_architecture(input: &str) -> Result<Architecture, ParseError> {
    let document = extract_document(input).ok_or(ParseError::Empty)?;
    match serde_json::from_str::<Architecture>(document) {
        Ok(architecture) => Ok(architecture),
        Err(err) if err.is_syntax() || err.is_eof() => {
            debug!(
                line = err.line(),
                column = err.column();
                "Strict JSON rejected; retrying as JSON5"
            );
            Ok(json5::from_str(document)?)
        }
        Err(err) => Err(err.into()),
    }
}
