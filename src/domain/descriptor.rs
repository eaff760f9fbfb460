//! Declarative description of a resource: which fields it accepts, how each is
//! checked, which other records it points at and where its name must be unique.
//!
//! The generic validator, checker and mutator are all driven by these tables, so
//! adding a resource means writing a descriptor, not another workflow.

use super::record::{ResourceKind, Status};

/// Lower bound applied to a date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Unbounded,
    /// Strictly later than the current time.
    Future,
    /// Strictly later than the named sibling field.
    After(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { max_len: Option<usize> },
    /// Text made of ASCII digits only, such as phone numbers.
    Digits { max_len: usize },
    Email,
    /// Positive integer identifier of another record.
    Id,
    Integer { min: i64 },
    /// Non-negative decimal amount.
    Money,
    OneOf(&'static [&'static str]),
    Date(DateBound),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    /// `status` field present on every resource.
    pub const fn status(name: &'static str) -> Self {
        Self::required(name, FieldKind::OneOf(Status::ALLOWED))
    }

    pub const fn name() -> Self {
        Self::required("name", FieldKind::Text { max_len: Some(50) })
    }
}

/// A foreign key that must resolve to an existing record before any write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target: ResourceKind,
}

impl Reference {
    pub const fn new(field: &'static str, target: ResourceKind) -> Self {
        Self { field, target }
    }
}

/// Field whose value may appear only once within `scope` (or globally).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueName {
    pub field: &'static str,
    pub scope: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub fields: &'static [FieldRule],
    /// Checked in order; the first entry is the owning scope where one exists.
    pub references: &'static [Reference],
    pub unique: Option<UniqueName>,
}

impl ResourceDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    pub fn reference(&self, field: &str) -> Option<&Reference> {
        self.references.iter().find(|reference| reference.field == field)
    }
}
