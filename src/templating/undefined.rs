//! Undefined-value policy.
//!
//! Decides what happens when a template uses a name or attribute that the
//! data does not contain. The policy is chosen once per invocation and
//! installed into the engine environment by [`UndefinedPolicy::apply`].
//!
//! - [`UndefinedPolicy::Strict`]: any use of a missing value aborts the render
//!   with an undefined-value error.
//! - [`UndefinedPolicy::Lenient`] (default): missing lookups produce the
//!   engine's undefined value, which absorbs everything applied to it.
//!   Printing it gives `""`, it is falsy, iterates as empty, has length `0`,
//!   and attribute or index access on it yields another undefined value. A
//!   chain such as `{{ user.profile.email }}` on empty data renders as `""`.

use minijinja::value::{Value, ValueKind};
use minijinja::{Environment, Error, ErrorKind, UndefinedBehavior};

/// How missing template values are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndefinedPolicy {
    /// Fail the render on any use of a missing value
    Strict,
    /// Substitute an absorbing undefined value
    #[default]
    Lenient,
}

impl UndefinedPolicy {
    /// Select the policy from the `--strict` flag.
    #[must_use]
    pub const fn from_strict(strict: bool) -> Self {
        if strict {
            UndefinedPolicy::Strict
        } else {
            UndefinedPolicy::Lenient
        }
    }

    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, UndefinedPolicy::Strict)
    }

    /// The engine behavior implementing this policy.
    #[must_use]
    pub const fn behavior(self) -> UndefinedBehavior {
        match self {
            UndefinedPolicy::Strict => UndefinedBehavior::Strict,
            UndefinedPolicy::Lenient => UndefinedBehavior::Chainable,
        }
    }

    /// Install this policy into an engine environment.
    ///
    /// Lenient mode also replaces the `length`, `count`, `first`, `last`
    /// and `items` filters, since the built-in versions reject undefined
    /// values.
    pub fn apply(self, env: &mut Environment<'_>) {
        env.set_undefined_behavior(self.behavior());

        if self == UndefinedPolicy::Lenient {
            env.add_filter("length", absorbing_length);
            env.add_filter("count", absorbing_length);
            env.add_filter("first", absorbing_first);
            env.add_filter("last", absorbing_last);
            env.add_filter("items", absorbing_items);
        }

        tracing::debug!("Undefined-value policy: {:?}", self);
    }
}

/// `length` that reports `0` for undefined values.
fn absorbing_length(value: &Value) -> Result<usize, Error> {
    if value.is_undefined() {
        return Ok(0);
    }

    value.len().ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot calculate length of value of type {}", value.kind()),
        )
    })
}

/// `first` that passes undefined values through.
fn absorbing_first(value: &Value) -> Result<Value, Error> {
    if value.is_undefined() {
        return Ok(Value::UNDEFINED);
    }

    if let Some(s) = value.as_str() {
        return Ok(s.chars().next().map_or(Value::UNDEFINED, |c| Value::from(c.to_string())));
    }

    Ok(sequence_items(value, "first")?.into_iter().next().unwrap_or(Value::UNDEFINED))
}

/// `last` that passes undefined values through.
fn absorbing_last(value: &Value) -> Result<Value, Error> {
    if value.is_undefined() {
        return Ok(Value::UNDEFINED);
    }

    if let Some(s) = value.as_str() {
        return Ok(s.chars().next_back().map_or(Value::UNDEFINED, |c| Value::from(c.to_string())));
    }

    Ok(sequence_items(value, "last")?.pop().unwrap_or(Value::UNDEFINED))
}

fn sequence_items(value: &Value, filter: &str) -> Result<Vec<Value>, Error> {
    if !matches!(value.kind(), ValueKind::Seq | ValueKind::Iterable) {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot get {filter} item from value of type {}", value.kind()),
        ));
    }

    Ok(value.try_iter()?.collect())
}

/// `items` that yields no pairs for undefined values.
fn absorbing_items(value: &Value) -> Result<Value, Error> {
    if value.is_undefined() {
        return Ok(Value::from(Vec::<Value>::new()));
    }

    if value.kind() != ValueKind::Map {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot convert value of type {} into pairs", value.kind()),
        ));
    }

    let pairs = value
        .try_iter()?
        .map(|key| {
            let item = value.get_item(&key)?;
            Ok(Value::from(vec![key, item]))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(Value::from(pairs))
}
