//! Text extraction from raw bytes.
//!
//! Detection order:
//! 1. UTF-8 / UTF-16 byte-order marks select the decoder.
//! 2. BOM-less content must be NUL-free valid UTF-8.
//!
//! Anything else is treated as undetectable and rejected.

use tracing::debug;

use docflow_core::config::ExtractionConfig;
use docflow_core::result::AppResult;
use docflow_core::traits::{ContentExtractor, ExtractedContent};

use crate::error::ExtractionError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Default [`ContentExtractor`] for plain-text documents.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    max_content_bytes: usize,
}

impl TextExtractor {
    /// Create an extractor enforcing `max_content_bytes`.
    pub fn new(max_content_bytes: usize) -> Self {
        Self { max_content_bytes }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.max_content_bytes)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl ContentExtractor for TextExtractor {
    fn extract(&self, content: &[u8], name_hint: Option<&str>) -> AppResult<ExtractedContent> {
        if content.len() > self.max_content_bytes {
            return Err(ExtractionError::TooLarge {
                size: content.len(),
                limit: self.max_content_bytes,
            }
            .into());
        }

        let (encoding, text) = decode(content)?;
        let lines = split_lines(&text);
        let content_type = detect_content_type(name_hint);

        debug!(
            encoding,
            content_type = %content_type,
            bytes = content.len(),
            lines = lines.len(),
            "Content extracted"
        );

        Ok(ExtractedContent {
            content_type,
            encoding: encoding.to_string(),
            lines,
        })
    }
}

fn decode(content: &[u8]) -> Result<(&'static str, String), ExtractionError> {
    let (encoding, text) = if let Some(rest) = content.strip_prefix(UTF8_BOM) {
        ("UTF-8", decode_utf8(rest)?)
    } else if let Some(rest) = content.strip_prefix(UTF16_LE_BOM) {
        ("UTF-16LE", decode_utf16(rest, u16::from_le_bytes, "UTF-16LE")?)
    } else if let Some(rest) = content.strip_prefix(UTF16_BE_BOM) {
        ("UTF-16BE", decode_utf16(rest, u16::from_be_bytes, "UTF-16BE")?)
    } else {
        ("UTF-8", decode_utf8(content)?)
    };

    if text.contains('\0') {
        return Err(ExtractionError::Binary);
    }
    Ok((encoding, text))
}

fn decode_utf8(bytes: &[u8]) -> Result<String, ExtractionError> {
    if bytes.contains(&0) {
        return Err(ExtractionError::Binary);
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::InvalidEncoding {
        encoding: "UTF-8",
        reason: e.to_string(),
    })
}

fn decode_utf16(
    bytes: &[u8],
    to_unit: fn([u8; 2]) -> u16,
    encoding: &'static str,
) -> Result<String, ExtractionError> {
    if bytes.len() % 2 != 0 {
        return Err(ExtractionError::InvalidEncoding {
            encoding,
            reason: "odd number of bytes".to_string(),
        });
    }
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| ExtractionError::InvalidEncoding {
            encoding,
            reason: e.to_string(),
        })
}

/// Split text on `\n`, `\r\n`, and lone `\r`. Terminators are dropped and a
/// trailing terminator does not produce an empty final line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\n' => lines.push(std::mem::take(&mut current)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Prefer the MIME type implied by the file name when it is textual.
fn detect_content_type(name_hint: Option<&str>) -> String {
    name_hint
        .and_then(|name| mime_guess::from_path(name).first())
        .filter(is_textual)
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

fn is_textual(mime: &mime_guess::Mime) -> bool {
    mime.type_() == mime_guess::mime::TEXT
        || matches!(
            mime.subtype().as_str(),
            "json" | "xml" | "javascript" | "x-sh" | "toml" | "yaml" | "x-yaml"
        )
        || mime.suffix().is_some_and(|s| s == "xml" || s == "json")
}
