//! Custom filters registered on every render environment.
//!
//! # `tojson`
//!
//! Serializes a value to JSON for embedding in the rendered text:
//!
//! ```text
//! {{ user | tojson }}            {# pretty-printed, 2-space indent #}
//! {{ user | tojson(4) }}         {# 4-space indent #}
//! {{ user | tojson(indent=0) }}  {# one item per line, no indentation #}
//! ```
//!
//! The output matches a standard JSON encoder: `,` plus newline between
//! items, `": "` between keys and values, non-ASCII characters kept as-is
//! and no HTML escaping. Mapping keys keep the order of the data document.
//!
//! An undefined value renders as `null` under the lenient policy. Under the
//! strict policy it is an undefined-value error like any other use.

use minijinja::value::{Kwargs, Value};
use minijinja::{Environment, Error, ErrorKind};
use serde::Serialize;

use super::undefined::UndefinedPolicy;

/// Indentation used when the template does not pass one.
pub const DEFAULT_JSON_INDENT: usize = 2;

/// Register the custom filter table on an environment.
pub fn register_filters(env: &mut Environment<'_>, policy: UndefinedPolicy) {
    let strict = policy.is_strict();

    // tojson filter: {{ value | tojson }} or {{ value | tojson(4) }} or {{ value | tojson(indent=4) }}
    env.add_filter(
        "tojson",
        move |value: Value, indent: Option<usize>, kwargs: Kwargs| -> Result<String, Error> {
            let keyword_indent = kwargs.get::<Option<usize>>("indent")?;
            kwargs.assert_all_used()?;

            // Strict mode still hands undefined values to filters (`default` depends on it)
            if value.is_undefined() && strict {
                return Err(Error::new(
                    ErrorKind::UndefinedError,
                    "undefined value passed to tojson",
                ));
            }

            let indent = keyword_indent.or(indent).unwrap_or(DEFAULT_JSON_INDENT);
            to_json(&value, indent)
        },
    );
}

/// Serialize a template value to pretty-printed JSON.
///
/// Undefined values serialize as `null`.
///
/// # Errors
///
/// Returns a `BadSerialization` error if the value cannot be represented as
/// JSON (for example a callable object).
pub fn to_json(value: &Value, indent: usize) -> Result<String, Error> {
    if value.is_undefined() {
        return Ok("null".to_string());
    }

    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);

    value.serialize(&mut serializer).map_err(|e| {
        Error::new(ErrorKind::BadSerialization, "unable to serialize value to JSON").with_source(e)
    })?;

    // serde_json only ever writes UTF-8
    String::from_utf8(buffer).map_err(|e| {
        Error::new(ErrorKind::BadSerialization, "JSON output is not valid UTF-8").with_source(e)
    })
}
