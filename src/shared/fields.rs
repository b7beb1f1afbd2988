//! Ordered field lookup over request sources
//!
//! Generation endpoints read `title` and `description` from the query string
//! first and the JSON body second. Each source implements [`FieldSource`] and
//! [`first_present`] walks them in order.

use crate::error::{AppError, AppResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A named place a request field can come from
pub trait FieldSource {
    /// Source name used in logs
    fn name(&self) -> &'static str;

    /// Value of `field`, or `None` if this source does not provide it
    fn get(&self, field: &str) -> AppResult<Option<String>>;
}

/// Query-string parameters
///
/// Empty values count as absent so they fall through to later sources.
pub struct QuerySource<'a>(pub &'a HashMap<String, String>);

impl FieldSource for QuerySource<'_> {
    fn name(&self) -> &'static str {
        "query"
    }

    fn get(&self, field: &str) -> AppResult<Option<String>> {
        Ok(self.0.get(field).filter(|v| !v.is_empty()).cloned())
    }
}

/// JSON request body, parsed on first use
///
/// An empty body provides no fields. A non-empty body that is not a JSON
/// object is a `Validation` error, raised only when a field is actually
/// looked up here.
pub struct JsonBodySource<'a> {
    raw: &'a [u8],
    parsed: OnceLock<Result<Map<String, Value>, String>>,
}

impl<'a> JsonBodySource<'a> {
    pub fn new(raw: &'a [u8]) -> Self {
        Self {
            raw,
            parsed: OnceLock::new(),
        }
    }

    fn object(&self) -> AppResult<&Map<String, Value>> {
        self.parsed
            .get_or_init(|| parse_body(self.raw))
            .as_ref()
            .map_err(|msg| AppError::Validation(msg.clone()))
    }
}

fn parse_body(raw: &[u8]) -> Result<Map<String, Value>, String> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "request body must be a JSON object, got {}",
            json_type_name(&other)
        )),
        Err(e) => Err(format!("request body is not valid JSON: {}", e)),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl FieldSource for JsonBodySource<'_> {
    fn name(&self) -> &'static str {
        "body"
    }

    fn get(&self, field: &str) -> AppResult<Option<String>> {
        let value = match self.object()?.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        Ok(value)
    }
}

/// First value for `field` across `sources`, in order
///
/// Later sources are not consulted once a value is found, so a body that is
/// never needed is never parsed.
pub fn first_present(field: &str, sources: &[&dyn FieldSource]) -> AppResult<Option<String>> {
    for source in sources {
        if let Some(value) = source.get(field)? {
            tracing::trace!(field = field, source = source.name(), "Resolved request field");
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// The two caller-supplied generation inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationFields {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl GenerationFields {
    /// Resolve `title` and `description` from the query string, then the body
    pub fn extract(query: &HashMap<String, String>, body: &[u8]) -> AppResult<Self> {
        let query = QuerySource(query);
        let body = JsonBodySource::new(body);
        let sources: [&dyn FieldSource; 2] = [&query, &body];

        Ok(Self {
            title: first_present("title", &sources)?,
            description: first_present("description", &sources)?,
        })
    }
}
