//! Format Adapters
//!
//! Each adapter turns the raw bytes of one agent file into the generic
//! [`Node`] tree. The adapter is chosen by file extension.

mod toml_adapter;
mod yaml_adapter;

pub use toml_adapter::TomlAdapter;
pub use yaml_adapter::YamlAdapter;

use crate::document::Node;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Position of a syntax error, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Compute line and column for a byte offset into `source`.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for (idx, ch) in source.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

/// Malformed source syntax or a tree the document builder cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub message: String,
    pub location: Option<Location>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    pub fn at(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location: Some(location),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{} (line {}, column {})",
                self.message, loc.line, loc.column
            ),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Yaml,
    Toml,
}

impl Format {
    /// Detect the format from a file extension (ASCII case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        [Format::Yaml, Format::Toml].into_iter().find(|format| {
            format
                .adapter()
                .extensions()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }

    pub fn adapter(self) -> &'static dyn FormatAdapter {
        match self {
            Format::Yaml => &YamlAdapter,
            Format::Toml => &TomlAdapter,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parser contract shared by the YAML and TOML adapters.
///
/// Adapters agree on scalar representation: strings, booleans, 64-bit
/// integers and floats map to the matching [`Node`] variant, so the document
/// builder needs no format-specific branching.
pub trait FormatAdapter: Send + Sync {
    fn format(&self) -> Format;

    /// Lowercase file extensions, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    fn parse(&self, bytes: &[u8]) -> Result<Node, ParseError>;
}

/// Adapter for a path, or `None` when the extension is not recognized.
pub fn adapter_for(path: &Path) -> Option<&'static dyn FormatAdapter> {
    Format::from_path(path).map(Format::adapter)
}

pub(crate) fn decode_utf8(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let location = Location::from_offset(
            // Everything before the bad byte is valid by definition.
            std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
            e.valid_up_to(),
        );
        ParseError::at(format!("file is not valid UTF-8: {}", e), location)
    })
}
