//! Existence and uniqueness checks run between validation and the write.
//!
//! Both fail closed: a lookup that errors is logged and treated as a refusal,
//! never as permission to write.

use super::repository::Repository;
use crate::domain::descriptor::{Reference, ResourceDescriptor};
use crate::domain::filter::Filter;
use crate::domain::record::{Document, RecordId};
use crate::error::{PosError, Result};
use serde_json::Value;
use tracing::error;

fn parent_not_found(reference: &Reference, id: RecordId) -> PosError {
    PosError::ParentNotFound {
        resource: reference.target.label(),
        field: reference.field,
        id,
    }
}

/// Every reference field present in `document` must point at a stored record.
pub async fn ensure_references(
    repository: &Repository,
    descriptor: &ResourceDescriptor,
    document: &Document,
) -> Result<()> {
    for reference in descriptor.references {
        let Some(id) = document.get(reference.field).and_then(Value::as_u64) else {
            continue;
        };
        match repository.lookup(reference.target, id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(parent_not_found(reference, id)),
            Err(cause) => {
                error!(resource = %reference.target, id, error = %cause, "reference lookup failed");
                return Err(parent_not_found(reference, id));
            }
        }
    }
    Ok(())
}

/// No other record in the same scope may carry the candidate's unique value.
/// `exclude` is the record's own id when updating.
pub async fn ensure_unique(
    repository: &Repository,
    descriptor: &ResourceDescriptor,
    document: &Document,
    exclude: Option<RecordId>,
) -> Result<()> {
    let Some(unique) = descriptor.unique else {
        return Ok(());
    };
    let Some(value) = document.get(unique.field) else {
        return Ok(());
    };

    let mut filter = Filter::all().eq(unique.field, value.clone());
    if let Some(scope) = unique.scope
        && let Some(parent) = document.get(scope)
    {
        filter = filter.eq(scope, parent.clone());
    }
    let filter = filter.excluding(exclude);

    match repository.find_first(descriptor.kind, &filter).await {
        Ok(None) => Ok(()),
        Ok(Some(_)) => Err(PosError::DuplicateName {
            field: unique.field,
            value: value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        }),
        Err(cause) => {
            error!(resource = %descriptor.kind, error = %cause, "uniqueness lookup failed");
            Err(PosError::Persistence { action: "checking" })
        }
    }
}
