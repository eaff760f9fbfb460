use super::descriptor::{DateBound, FieldKind, FieldRule, ResourceDescriptor};
use super::record::{Document, RecordId};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProblemKind {
    MissingField,
    InvalidFormat,
    InvalidEnum,
}

/// One human-readable reason a candidate record was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub field: String,
    pub message: String,
}

impl Problem {
    pub fn new(kind: ProblemKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(
            ProblemKind::MissingField,
            field,
            format!("missing field: {field}"),
        )
    }

    fn blank(field: &str) -> Self {
        Self::new(
            ProblemKind::InvalidFormat,
            field,
            format!("please specify: {field}"),
        )
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::new(ProblemKind::InvalidFormat, field, message)
    }
}

/// Checks a candidate against its descriptor in three phases.
///
/// Presence problems are returned on their own, then whitespace-only text, and
/// only a candidate passing both gets the per-field semantic checks. An empty
/// result is the only success signal.
pub fn validate(
    descriptor: &ResourceDescriptor,
    candidate: &Value,
    now: DateTime<Utc>,
) -> Vec<Problem> {
    let Some(object) = candidate.as_object() else {
        return vec![Problem::invalid("body", "request body must be a JSON object")];
    };

    let mut problems: Vec<Problem> = descriptor
        .fields
        .iter()
        .filter(|rule| rule.required && is_absent(rule, object.get(rule.name)))
        .map(|rule| Problem::missing(rule.name))
        .collect();
    if !problems.is_empty() {
        return problems;
    }

    problems.extend(
        present(descriptor, object)
            .filter(|(_, value)| is_blank(value))
            .map(|(rule, _)| Problem::blank(rule.name)),
    );
    if !problems.is_empty() {
        return problems;
    }

    problems.extend(
        present(descriptor, object)
            .filter_map(|(rule, value)| check_semantics(rule, value, object, now)),
    );
    problems
}

/// Keeps only the declared fields of a validated candidate, converting numeric
/// strings to numbers, amounts to decimal strings and dates to RFC 3339 UTC.
pub fn normalize(descriptor: &ResourceDescriptor, candidate: &Value) -> Document {
    let mut document = Document::new();
    let Some(object) = candidate.as_object() else {
        return document;
    };

    for (rule, value) in present(descriptor, object) {
        let normalized = match rule.kind {
            FieldKind::Id => parse_id(value).map(Value::from),
            FieldKind::Integer { .. } => parse_integer(value).map(Value::from),
            FieldKind::Money => parse_decimal(value).map(|amount| Value::String(amount.to_string())),
            FieldKind::Date(_) => parse_date(value).map(|date| Value::String(date.to_rfc3339())),
            _ => Some(value.clone()),
        };
        if let Some(value) = normalized {
            document.insert(rule.name.to_string(), value);
        }
    }
    document
}

fn present<'a>(
    descriptor: &'a ResourceDescriptor,
    object: &'a Document,
) -> impl Iterator<Item = (&'a FieldRule, &'a Value)> + 'a {
    descriptor.fields.iter().filter_map(move |rule| {
        object
            .get(rule.name)
            .filter(|value| !is_absent(rule, Some(value)))
            .map(|value| (rule, value))
    })
}

fn is_absent(rule: &FieldRule, value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(value) => rule.kind == FieldKind::Id && value.as_u64() == Some(0),
    }
}

fn is_blank(value: &Value) -> bool {
    value.as_str().is_some_and(|text| text.trim().is_empty())
}

fn check_semantics(
    rule: &FieldRule,
    value: &Value,
    object: &Document,
    now: DateTime<Utc>,
) -> Option<Problem> {
    let field = rule.name;
    match rule.kind {
        FieldKind::Text { max_len } => match value.as_str() {
            Some(text) => exceeds(field, text, max_len),
            None => Some(Problem::invalid(field, format!("{field} must be text"))),
        },
        FieldKind::Digits { max_len } => match value.as_str() {
            Some(text) => exceeds(field, text, Some(max_len)).or_else(|| {
                (!text.chars().all(|c| c.is_ascii_digit()))
                    .then(|| Problem::invalid(field, format!("{field} must contain digits only")))
            }),
            None => Some(Problem::invalid(field, format!("{field} must contain digits only"))),
        },
        FieldKind::Email => match value.as_str() {
            Some(text) if is_email(text) => exceeds(field, text, Some(100)),
            _ => Some(Problem::invalid(
                field,
                format!("{field} must be a valid email address"),
            )),
        },
        FieldKind::Id => parse_id(value)
            .is_none()
            .then(|| Problem::invalid(field, format!("{field} must be a number"))),
        FieldKind::Integer { min } => match parse_integer(value) {
            Some(number) if number >= min => None,
            _ => Some(Problem::invalid(
                field,
                format!("{field} must be a whole number of at least {min}"),
            )),
        },
        FieldKind::Money => match parse_decimal(value) {
            Some(amount) if !amount.is_sign_negative() => None,
            _ => Some(Problem::invalid(
                field,
                format!("{field} must be a non-negative amount"),
            )),
        },
        FieldKind::OneOf(allowed) => match value.as_str() {
            Some(text) if allowed.contains(&text) => None,
            _ => Some(Problem::new(
                ProblemKind::InvalidEnum,
                field,
                format!("{field} must be {} only", allowed.join(" or ")),
            )),
        },
        FieldKind::Date(bound) => {
            let Some(date) = parse_date(value) else {
                return Some(Problem::invalid(field, format!("{field} must be a valid date")));
            };
            match bound {
                DateBound::Unbounded => None,
                DateBound::Future => (date <= now).then(|| {
                    Problem::invalid(field, format!("{field} must be later than the current time"))
                }),
                DateBound::After(other) => object
                    .get(other)
                    .and_then(parse_date)
                    .filter(|earlier| date <= *earlier)
                    .map(|_| Problem::invalid(field, format!("{field} must be later than {other}"))),
            }
        }
    }
}

fn exceeds(field: &str, text: &str, max_len: Option<usize>) -> Option<Problem> {
    max_len
        .filter(|max| text.chars().count() > *max)
        .map(|max| Problem::invalid(field, format!("{field} must not exceed {max} characters")))
}

fn is_email(text: &str) -> bool {
    text.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    })
}

/// Positive identifier from a JSON number or numeric string.
pub fn parse_id(value: &Value) -> Option<RecordId> {
    let id = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<RecordId>().ok(),
        _ => None,
    };
    id.filter(|id| *id > 0)
}

pub fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        Value::String(text) => Decimal::from_str(text.trim()).ok(),
        _ => None,
    }
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|date| date.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
}
