//! Declarative request validation for inbound HTTP adapters.
//!
//! A rule set is an ordered slice of [`Check`] descriptors, each naming a
//! field, a [`Rule`] and the message reported when that rule fails.
//! [`validate`] interprets a rule set against raw input and yields either a
//! normalised JSON object holding only recognised fields (trimmed, coerced
//! and defaulted) or every violation in rule order. Consecutive checks on the
//! same field form that field's chain; the first failing check ends the chain.
//!
//! Handlers go through [`extract`], which reports the first violation as a
//! `400 invalid_request` and deserialises the normalised object into a typed
//! parameter struct.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;
use url::Url;

use crate::domain::{Error, ObjectId};

/// Parses a case-insensitive enum spelling into its canonical wire form.
pub(crate) type EnumParser = fn(&str) -> Option<String>;

/// Constant substituted for an absent field by [`Rule::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    Int(i64),
    Str(&'static str),
}

impl Literal {
    fn to_value(self) -> Value {
        match self {
            Self::Int(value) => Value::from(value),
            Self::Str(value) => Value::from(value),
        }
    }
}

/// One validation or normalisation step applied to a field.
#[derive(Clone, Copy)]
pub(crate) enum Rule {
    /// Read the value from another key when the field itself is absent.
    Alias(&'static str),
    /// Substitute a constant when the field is absent.
    Default(Literal),
    /// Fail when the field is absent.
    Required,
    /// Stop the chain silently when the field is absent.
    Optional,
    /// Require a string and trim it.
    String,
    /// Require a non-blank string or a non-empty array.
    NonEmpty,
    /// Require a string of at least this many characters.
    MinLength(usize),
    /// Require an integer (numbers or numeric strings) no smaller than `min`.
    Int { min: i64 },
    /// Require a boolean (`true`/`false` strings are coerced).
    Bool,
    /// Require an absolute `http` or `https` URL.
    Url,
    /// Require a syntactically valid e-mail address.
    Email,
    /// Require an ISO-8601 date or date-time; normalised to RFC 3339 UTC.
    IsoDate,
    /// Require one of an enum's spellings; normalised to the canonical form.
    OneOf(EnumParser),
    /// Require a 24-character hexadecimal object identifier.
    ObjectId,
    /// Require an array of objects, each validated by the nested rule set.
    ArrayOf(&'static [Check]),
}

/// `(field, rule, message)` descriptor interpreted by [`validate`].
#[derive(Clone, Copy)]
pub(crate) struct Check {
    pub(crate) field: &'static str,
    pub(crate) rule: Rule,
    pub(crate) message: &'static str,
}

/// Build a [`Check`] descriptor.
pub(crate) const fn check(field: &'static str, rule: Rule, message: &'static str) -> Check {
    Check {
        field,
        rule,
        message,
    }
}

/// Canonicalise an enum spelling via its `FromStr`/`Display` pair.
pub(crate) fn canonical<T>(raw: &str) -> Option<String>
where
    T: FromStr + fmt::Display,
{
    raw.parse::<T>().ok().map(|value| value.to_string())
}

/// A failed check, addressed by its dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Violation {
    pub(crate) field: String,
    pub(crate) message: &'static str,
}

enum Step {
    Next(Option<Value>),
    Stop,
}

/// Interpret `checks` against `input`.
pub(crate) fn validate(
    checks: &[Check],
    input: &Map<String, Value>,
) -> Result<Map<String, Value>, Vec<Violation>> {
    validate_at(checks, input, "")
}

fn validate_at(
    checks: &[Check],
    input: &Map<String, Value>,
    prefix: &str,
) -> Result<Map<String, Value>, Vec<Violation>> {
    let mut output = Map::new();
    let mut violations = Vec::new();

    for chain in checks.chunk_by(|left, right| left.field == right.field) {
        let Some(first) = chain.first() else {
            continue;
        };
        let path = if prefix.is_empty() {
            first.field.to_owned()
        } else {
            format!("{prefix}.{}", first.field)
        };

        let mut value = present(input, first.field);
        for check in chain {
            match apply(check, value.take(), input, &path) {
                Ok(Step::Next(next)) => value = next,
                Ok(Step::Stop) => break,
                Err(mut failed) => {
                    violations.append(&mut failed);
                    break;
                }
            }
        }
        if let Some(value) = value {
            output.insert(first.field.to_owned(), value);
        }
    }

    if violations.is_empty() {
        Ok(output)
    } else {
        Err(violations)
    }
}

fn present(input: &Map<String, Value>, key: &str) -> Option<Value> {
    input.get(key).filter(|value| !value.is_null()).cloned()
}

fn apply(
    check: &Check,
    value: Option<Value>,
    input: &Map<String, Value>,
    path: &str,
) -> Result<Step, Vec<Violation>> {
    let fail = || {
        vec![Violation {
            field: path.to_owned(),
            message: check.message,
        }]
    };

    match check.rule {
        Rule::Alias(other) => return Ok(Step::Next(value.or_else(|| present(input, other)))),
        Rule::Default(literal) => {
            return Ok(Step::Next(Some(value.unwrap_or_else(|| literal.to_value()))));
        }
        Rule::Optional if value.is_none() => return Ok(Step::Stop),
        Rule::Optional => return Ok(Step::Next(value)),
        _ => {}
    }

    let Some(value) = value else {
        return Err(fail());
    };
    let normalised = match (check.rule, value) {
        (Rule::Required, value) => Some(value),
        (Rule::String, Value::String(text)) => Some(Value::String(text.trim().to_owned())),
        (Rule::NonEmpty, Value::String(text)) if !text.trim().is_empty() => {
            Some(Value::String(text))
        }
        (Rule::NonEmpty, Value::Array(items)) if !items.is_empty() => Some(Value::Array(items)),
        (Rule::MinLength(min), Value::String(text)) if text.chars().count() >= min => {
            Some(Value::String(text))
        }
        (Rule::Int { min }, value) => integer(&value)
            .filter(|number| *number >= min)
            .map(Value::from),
        (Rule::Bool, value) => boolean(&value).map(Value::Bool),
        (Rule::Url, Value::String(text)) if is_http_url(&text) => Some(Value::String(text)),
        (Rule::Email, Value::String(text)) if is_email(&text) => Some(Value::String(text)),
        (Rule::IsoDate, Value::String(text)) => parse_iso_date(&text).map(|date| {
            Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))
        }),
        (Rule::OneOf(parse), Value::String(text)) => parse(&text).map(Value::String),
        (Rule::ObjectId, Value::String(text)) => text
            .trim()
            .parse::<ObjectId>()
            .ok()
            .map(|id| Value::String(id.to_string())),
        (Rule::ArrayOf(nested), Value::Array(items)) => {
            return validate_items(nested, items, path).map(|items| Step::Next(Some(items)));
        }
        _ => None,
    };

    normalised.map(|value| Step::Next(Some(value))).ok_or_else(fail)
}

fn validate_items(
    nested: &[Check],
    items: Vec<Value>,
    path: &str,
) -> Result<Value, Vec<Violation>> {
    let mut output = Vec::with_capacity(items.len());
    let mut violations = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        let item_path = format!("{path}[{index}]");
        match item {
            Value::Object(fields) => match validate_at(nested, &fields, &item_path) {
                Ok(normalised) => output.push(Value::Object(normalised)),
                Err(mut failed) => violations.append(&mut failed),
            },
            _ => violations.push(Violation {
                field: item_path,
                message: "each entry must be an object.",
            }),
        }
    }
    if violations.is_empty() {
        Ok(Value::Array(output))
    } else {
        Err(violations)
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) if text.trim().eq_ignore_ascii_case("true") => Some(true),
        Value::String(text) if text.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn is_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn parse_iso_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Convert the first violation into the client-facing error.
pub(crate) fn first_violation(violations: Vec<Violation>) -> Error {
    let total = violations.len();
    match violations.into_iter().next() {
        Some(Violation { field, message }) => {
            debug!(%field, total, "request failed validation");
            Error::invalid_request(message).with_details(json!({ "field": field }))
        }
        None => Error::invalid_request("request failed validation."),
    }
}

/// Validate `input` and deserialise the normalised object into `T`.
pub(crate) fn extract<T>(checks: &[Check], input: &Map<String, Value>) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    let normalised = validate(checks, input).map_err(first_violation)?;
    serde_json::from_value(Value::Object(normalised)).map_err(|err| {
        Error::invalid_request("request could not be decoded.")
            .with_details(json!({ "reason": err.to_string() }))
    })
}

/// Lift decoded query-string pairs into a validator input.
pub(crate) fn query_input(params: HashMap<String, String>) -> Map<String, Value> {
    params
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

/// Lift a single path parameter into a validator input.
pub(crate) fn path_input(field: &str, raw: String) -> Map<String, Value> {
    let mut input = Map::new();
    input.insert(field.to_owned(), Value::String(raw));
    input
}

/// Require a JSON object body.
pub(crate) fn body_input(body: Value) -> Result<Map<String, Value>, Error> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(Error::invalid_request("request body must be a JSON object.")),
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
