use super::record::{Document, ID, RecordId};
use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(String, Value),
    /// Skips the record with this identifier (self-exclusion on update).
    Excluding(RecordId),
    /// Timestamp field at or after the given instant.
    Since(String, DateTime<Utc>),
}

/// Conjunction of conditions understood by every store adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Equals(field.into(), value.into()));
        self
    }

    pub fn excluding(mut self, id: Option<RecordId>) -> Self {
        if let Some(id) = id {
            self.conditions.push(Condition::Excluding(id));
        }
        self
    }

    pub fn since(mut self, field: impl Into<String>, at: DateTime<Utc>) -> Self {
        self.conditions.push(Condition::Since(field.into(), at));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Equals(field, value) => document.get(field) == Some(value),
            Condition::Excluding(id) => document.get(ID).and_then(Value::as_u64) != Some(*id),
            Condition::Since(field, at) => document
                .get(field)
                .and_then(Value::as_str)
                .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
                .is_some_and(|stamp| stamp.with_timezone(&Utc) >= *at),
        })
    }
}
