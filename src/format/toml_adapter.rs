use super::{decode_utf8, Format, FormatAdapter, Location, ParseError};
use crate::document::Node;
use toml::Value;

/// `.toml` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlAdapter;

impl FormatAdapter for TomlAdapter {
    fn format(&self) -> Format {
        Format::Toml
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn parse(&self, bytes: &[u8]) -> Result<Node, ParseError> {
        let text = decode_utf8(bytes)?;
        let table: toml::Table = toml::from_str(text).map_err(|e| ParseError {
            message: e.message().trim().to_string(),
            location: e.span().map(|span| Location::from_offset(text, span.start)),
        })?;
        Ok(convert(Value::Table(table)))
    }
}

fn convert(value: Value) -> Node {
    match value {
        Value::String(s) => Node::String(s),
        Value::Integer(i) => Node::Integer(i),
        Value::Float(f) => Node::Float(f),
        Value::Boolean(b) => Node::Bool(b),
        Value::Datetime(dt) => Node::String(dt.to_string()),
        Value::Array(items) => Node::Sequence(items.into_iter().map(convert).collect()),
        Value::Table(table) => Node::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (key, convert(value)))
                .collect(),
        ),
    }
}
