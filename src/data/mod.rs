//! Data loading with JSON/YAML format detection.
//!
//! The loader reads the whole data source into memory and decodes it into a
//! [`serde_json::Value`], the structured value handed to the template engine.
//!
//! # Decoding Order
//!
//! Decoding is sequential and fixed:
//! 1. [`try_json`] - strict JSON
//! 2. [`try_yaml`] - only when JSON fails with a syntax or end-of-input error
//!
//! JSON goes first because YAML's looser grammar would accept most JSON
//! documents too, and could read bare scalars differently. A document that is
//! valid JSON is therefore always decoded as JSON, even if it was meant as
//! YAML.
//!
//! If both decoders fail, one [`CtxgenError::DataFormat`] is reported that
//! quotes the YAML diagnostic and keeps the JSON one for the details.
//!
//! # Examples
//!
//! ```rust,no_run
//! use ctxgen_cli::data::{self, DataSource};
//!
//! # fn example() -> anyhow::Result<()> {
//! let source = DataSource::from_arg(Some("data.yaml"));
//! let value = data::load(&source)?;
//! let context = data::into_context(value)?;
//! assert!(context.contains_key("name"));
//! # Ok(())
//! # }
//! ```

use serde_json::{Map, Value};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::{CtxgenError, InputKind};

/// The variables bound at the top level of a template.
pub type Context = Map<String, Value>;

/// UTF-8 byte-order mark, stripped before decoding.
const UTF8_BOM: char = '\u{feff}';

/// Where the data document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Read the whole of standard input
    Stdin,
    /// Read a file
    Path(PathBuf),
}

impl DataSource {
    /// Map the `--data` argument to a source.
    ///
    /// An absent argument and the sentinel `-` both mean standard input.
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => DataSource::Stdin,
            Some(path) => DataSource::Path(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Stdin => write!(f, "standard input"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load and decode the data document from `source`.
///
/// # Errors
///
/// - [`CtxgenError::InputNotFound`] if a data file does not exist (checked
///   before anything is read)
/// - [`CtxgenError::DataRead`] if the source cannot be read
/// - [`CtxgenError::DataFormat`] if the content is not UTF-8, or is neither
///   JSON nor YAML
pub fn load(source: &DataSource) -> Result<Value, CtxgenError> {
    let bytes = read_source(source)?;
    tracing::debug!("Read {} bytes of data from {}", bytes.len(), source);

    let content = String::from_utf8(bytes).map_err(|e| CtxgenError::DataFormat {
        source_name: source.to_string(),
        reason: format!("content is not valid UTF-8: {e}"),
        json_error: None,
    })?;

    decode(&content, &source.to_string())
}

/// Read the raw bytes of a data source into memory.
fn read_source(source: &DataSource) -> Result<Vec<u8>, CtxgenError> {
    match source {
        DataSource::Stdin => {
            let mut buffer = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buffer).map_err(|e| {
                CtxgenError::DataRead {
                    source_name: source.to_string(),
                    reason: e.to_string(),
                }
            })?;
            Ok(buffer)
        }
        DataSource::Path(path) => read_data_file(path),
    }
}

fn read_data_file(path: &Path) -> Result<Vec<u8>, CtxgenError> {
    if !path.exists() {
        return Err(CtxgenError::InputNotFound {
            kind: InputKind::Data,
            path: path.display().to_string(),
        });
    }

    std::fs::read(path).map_err(|e| CtxgenError::DataRead {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Decode text as JSON, falling back to YAML.
///
/// `source_name` only labels the error.
///
/// # Errors
///
/// Returns [`CtxgenError::DataFormat`] if neither decoder accepts the text.
pub fn decode(content: &str, source_name: &str) -> Result<Value, CtxgenError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    let json_error = match try_json(content) {
        Ok(value) => {
            tracing::debug!("Decoded data from {} as JSON", source_name);
            return Ok(value);
        }
        Err(e) if e.is_syntax() || e.is_eof() => e,
        Err(e) => {
            return Err(CtxgenError::DataFormat {
                source_name: source_name.to_string(),
                reason: e.to_string(),
                json_error: None,
            });
        }
    };

    tracing::debug!("Data from {} is not JSON ({}), trying YAML", source_name, json_error);

    match try_yaml(content) {
        Ok(value) => {
            tracing::debug!("Decoded data from {} as YAML", source_name);
            Ok(value)
        }
        Err(yaml_error) => Err(CtxgenError::DataFormat {
            source_name: source_name.to_string(),
            reason: yaml_error.to_string(),
            json_error: Some(json_error.to_string()),
        }),
    }
}

/// Decode text as a JSON document.
///
/// # Errors
///
/// Returns the `serde_json` error unchanged so callers can classify it.
pub fn try_json(content: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(content)
}

/// Decode text as a single YAML document.
///
/// An empty document decodes to `null`. Mapping keys that are not strings
/// are converted to their textual form, tags are dropped and non-finite
/// floats become `null`, so the result is always a valid JSON value.
///
/// # Errors
///
/// Returns the `serde_yaml` error for invalid YAML or multi-document input.
pub fn try_yaml(content: &str) -> Result<Value, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(yaml_to_json(value))
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number_to_json(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping.into_iter().map(|(k, v)| (yaml_key_to_string(k), yaml_to_json(v))).collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number_to_json(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else if let Some(f) = n.as_f64() {
        serde_json::Number::from_f64(f).map(Value::Number).unwrap_or_else(|| {
            tracing::warn!("YAML number {} has no JSON representation, using null", n);
            Value::Null
        })
    } else {
        Value::Null
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => match yaml_to_json(other) {
            Value::String(s) => s,
            converted => converted.to_string(),
        },
    }
}

/// Turn the decoded document into the template's top-level variables.
///
/// A mapping binds each key as a variable. `null`, which is what an empty
/// document decodes to, binds nothing.
///
/// # Errors
///
/// Returns [`CtxgenError::TopLevelNotMapping`] for arrays and scalars.
pub fn into_context(value: Value) -> Result<Context, CtxgenError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Context::new()),
        other => Err(CtxgenError::TopLevelNotMapping {
            found: describe_kind(&other),
        }),
    }
}

fn describe_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a mapping",
    }
}
