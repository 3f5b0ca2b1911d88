use super::{decode_utf8, Format, FormatAdapter, Location, ParseError};
use crate::document::Node;
use serde_yaml::Value;
use std::collections::BTreeMap;

/// `.yaml` / `.yml` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlAdapter;

impl FormatAdapter for YamlAdapter {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn parse(&self, bytes: &[u8]) -> Result<Node, ParseError> {
        let text = decode_utf8(bytes)?;
        let value: Value = serde_yaml::from_str(text).map_err(|e| {
            let location = e.location().map(|loc| Location {
                line: loc.line(),
                column: loc.column(),
            });
            ParseError {
                message: e.to_string(),
                location,
            }
        })?;
        convert(value)
    }
}

fn convert(value: Value) -> Result<Node, ParseError> {
    Ok(match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Node::Integer(i),
            None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Node::String(s),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(convert)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = BTreeMap::new();
            for (key, value) in map {
                out.insert(mapping_key(key)?, convert(value)?);
            }
            Node::Mapping(out)
        }
        Value::Tagged(tagged) => convert(tagged.value)?,
    })
}

fn mapping_key(key: Value) -> Result<String, ParseError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Tagged(tagged) => mapping_key(tagged.value),
        other => Err(ParseError::new(format!(
            "unsupported mapping key: {}",
            match other {
                Value::Null => "null",
                Value::Sequence(_) => "sequence",
                _ => "mapping",
            }
        ))),
    }
}
