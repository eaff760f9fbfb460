use super::checker::{ensure_references, ensure_unique};
use super::envelope::Envelope;
use super::pool::ConnectionPool;
use super::repository::Repository;
use crate::domain::clock::Clock;
use crate::domain::descriptor::ResourceDescriptor;
use crate::domain::filter::Filter;
use crate::domain::record::{Document, ID, RecordId, ResourceKind};
use crate::domain::resources::Resource;
use crate::domain::validation::{Problem, ProblemKind, normalize, parse_id, validate};
use crate::error::{PosError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(crate) const SAVED: &str = "Data saved successfully.";
pub(crate) const DELETED: &str = "Successfully deleted data";

/// Checkpoints a request passes through on its way to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Validated,
    ParentChecked,
    UniquenessChecked,
    Mutated,
    Responded,
}

/// Tracks how far a single request got, for the logs.
pub(crate) struct Progress {
    kind: ResourceKind,
    operation: &'static str,
    stage: Stage,
}

impl Progress {
    pub(crate) fn start(kind: ResourceKind, operation: &'static str) -> Self {
        debug!(resource = %kind, operation, "request received");
        Self {
            kind,
            operation,
            stage: Stage::Received,
        }
    }

    pub(crate) fn advance(&mut self, stage: Stage) {
        debug!(resource = %self.kind, operation = self.operation, ?stage, "stage reached");
        self.stage = stage;
    }
}

/// Turns the outcome of a request into its envelope. Rejections are logged
/// with the last stage the request passed.
pub(crate) fn respond<T>(mut progress: Progress, outcome: Result<Envelope<T>>) -> Envelope<T> {
    let envelope = match outcome {
        Ok(envelope) => envelope,
        Err(error) => {
            warn!(
                resource = %progress.kind,
                operation = progress.operation,
                stage = ?progress.stage,
                code = error.status_code(),
                %error,
                "request rejected"
            );
            Envelope::rejected(progress.kind.key(), &error)
        }
    };
    progress.advance(Stage::Responded);
    envelope
}

/// Validates `body` and returns its normalized form, ready for the checks.
pub(crate) fn validated(
    descriptor: &ResourceDescriptor,
    body: &Value,
    now: DateTime<Utc>,
) -> Result<Document> {
    let problems = validate(descriptor, body, now);
    if !problems.is_empty() {
        return Err(PosError::Validation(problems));
    }
    Ok(normalize(descriptor, body))
}

pub(crate) fn found_message(kind: ResourceKind) -> String {
    let label = kind.label();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => format!("{}{} found", first.to_uppercase(), chars.as_str()),
        None => "Found".to_string(),
    }
}

pub(crate) fn not_found_message(kind: ResourceKind, by: Option<(&str, RecordId)>) -> String {
    match by {
        Some((field, id)) => format!("No {} found with {field} : {id}", kind.label()),
        None => format!("No {} found", kind.label()),
    }
}

/// Identifier carried in an update body.
fn body_id(kind: ResourceKind, body: &Value) -> Result<RecordId> {
    match body.get(ID).filter(|value| !value.is_null()) {
        None => Err(PosError::Validation(vec![Problem::new(
            ProblemKind::MissingField,
            ID,
            format!("Please specify {}Id.", kind.key()),
        )])),
        Some(value) => parse_id(value).ok_or_else(|| {
            PosError::Validation(vec![Problem::invalid(
                ID,
                format!("Please specify {}Id.", kind.key()),
            )])
        }),
    }
}

/// The add/get/list/update/delete workflow shared by every descriptor-driven
/// resource.
///
/// Writes always run validation, then reference checks, then the uniqueness
/// check, and only then the single store mutation. A failure at any step
/// ends the request with a rejection envelope; the store is never touched
/// past that point.
#[derive(Clone)]
pub struct CrudWorkflow {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl CrudWorkflow {
    pub fn new(pool: ConnectionPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository: Repository::new(pool),
            clock,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub async fn add<R: Resource>(&self, body: &Value) -> Envelope<R> {
        let mut progress = Progress::start(R::DESCRIPTOR.kind, "add");
        let outcome = self.try_add::<R>(body, &mut progress).await;
        respond(progress, outcome)
    }

    pub async fn get<R: Resource>(&self, id: RecordId) -> Envelope<R> {
        let progress = Progress::start(R::DESCRIPTOR.kind, "get");
        let outcome = self.try_get::<R>(id).await;
        respond(progress, outcome)
    }

    /// All records, or those whose reference field `by.0` equals `by.1`.
    pub async fn list<R: Resource>(&self, by: Option<(&str, RecordId)>) -> Envelope<Vec<R>> {
        let progress = Progress::start(R::DESCRIPTOR.kind, "list");
        let outcome = self.try_list::<R>(by).await;
        respond(progress, outcome)
    }

    pub async fn update<R: Resource>(&self, body: &Value) -> Envelope<R> {
        let mut progress = Progress::start(R::DESCRIPTOR.kind, "update");
        let outcome = self.try_update::<R>(body, &mut progress).await;
        respond(progress, outcome)
    }

    pub async fn delete<R: Resource>(&self, id: RecordId) -> Envelope<R> {
        let mut progress = Progress::start(R::DESCRIPTOR.kind, "delete");
        let outcome = self.try_delete::<R>(id, &mut progress).await;
        respond(progress, outcome)
    }

    /// Removes the `delete` records, then adds or updates each `upsert` body
    /// (update when it carries an `id`), returning the saved records in order.
    ///
    /// Every body is validated and every referenced id must exist before the
    /// first write. Checks that need the store (references, uniqueness) run
    /// per record, so a rejection there leaves earlier writes in place.
    pub async fn batch<R: Resource>(
        &self,
        delete: &[RecordId],
        upsert: &[Value],
    ) -> Envelope<Vec<R>> {
        let mut progress = Progress::start(R::DESCRIPTOR.kind, "batch");
        let outcome = self.try_batch::<R>(delete, upsert, &mut progress).await;
        respond(progress, outcome)
    }

    async fn try_add<R: Resource>(
        &self,
        body: &Value,
        progress: &mut Progress,
    ) -> Result<Envelope<R>> {
        let descriptor = R::DESCRIPTOR;
        let now = self.clock.now();

        let document = validated(descriptor, body, now)?;
        progress.advance(Stage::Validated);
        ensure_references(&self.repository, descriptor, &document).await?;
        progress.advance(Stage::ParentChecked);
        ensure_unique(&self.repository, descriptor, &document, None).await?;
        progress.advance(Stage::UniquenessChecked);

        let record: R = self.repository.insert(document, now).await?;
        progress.advance(Stage::Mutated);
        info!(resource = %descriptor.kind, id = record.id(), "record created");
        Ok(Envelope::success(descriptor.kind.key(), SAVED, record))
    }

    async fn try_get<R: Resource>(&self, id: RecordId) -> Result<Envelope<R>> {
        let kind = R::DESCRIPTOR.kind;
        let record = self
            .repository
            .fetch::<R>(id)
            .await?
            .ok_or(PosError::NotFound {
                resource: kind.label(),
                id,
            })?;
        Ok(Envelope::success(kind.key(), found_message(kind), record))
    }

    async fn try_list<R: Resource>(&self, by: Option<(&str, RecordId)>) -> Result<Envelope<Vec<R>>> {
        let descriptor = R::DESCRIPTOR;
        let kind = descriptor.kind;
        let filter = match by {
            None => Filter::all(),
            Some((field, id)) => {
                let reference = descriptor.reference(field).ok_or_else(|| PosError::Unsupported {
                    resource: kind.label(),
                    operation: format!("list by {field}"),
                })?;
                Filter::all().eq(reference.field, id)
            }
        };

        let records = self.repository.fetch_many::<R>(&filter).await?;
        if records.is_empty() {
            debug!(resource = %kind, ?by, "no records");
            return Ok(Envelope::empty(kind.key(), not_found_message(kind, by)));
        }
        Ok(Envelope::success(kind.key(), found_message(kind), records))
    }

    async fn try_update<R: Resource>(
        &self,
        body: &Value,
        progress: &mut Progress,
    ) -> Result<Envelope<R>> {
        let descriptor = R::DESCRIPTOR;
        let kind = descriptor.kind;
        let id = body_id(kind, body)?;

        if self.repository.fetch::<R>(id).await?.is_none() {
            return Err(PosError::NotFound {
                resource: kind.label(),
                id,
            });
        }

        let document = validated(descriptor, body, self.clock.now())?;
        progress.advance(Stage::Validated);
        ensure_references(&self.repository, descriptor, &document).await?;
        progress.advance(Stage::ParentChecked);
        ensure_unique(&self.repository, descriptor, &document, Some(id)).await?;
        progress.advance(Stage::UniquenessChecked);

        let record = self
            .repository
            .update::<R>(id, document)
            .await?
            .ok_or(PosError::NotFound {
                resource: kind.label(),
                id,
            })?;
        progress.advance(Stage::Mutated);
        info!(resource = %kind, id, "record updated");
        Ok(Envelope::success(kind.key(), SAVED, record))
    }

    async fn try_delete<R: Resource>(
        &self,
        id: RecordId,
        progress: &mut Progress,
    ) -> Result<Envelope<R>> {
        let kind = R::DESCRIPTOR.kind;
        let not_found = || PosError::NotFound {
            resource: kind.label(),
            id,
        };

        if self.repository.fetch::<R>(id).await?.is_none() {
            return Err(not_found());
        }
        let removed = self.repository.delete::<R>(id).await?.ok_or_else(not_found)?;
        progress.advance(Stage::Mutated);
        info!(resource = %kind, id, "record deleted");
        Ok(Envelope::success(kind.key(), DELETED, removed))
    }

    async fn try_batch<R: Resource>(
        &self,
        delete: &[RecordId],
        upsert: &[Value],
        progress: &mut Progress,
    ) -> Result<Envelope<Vec<R>>> {
        let descriptor = R::DESCRIPTOR;
        let kind = descriptor.kind;
        let now = self.clock.now();

        let problems: Vec<Problem> = upsert
            .iter()
            .flat_map(|body| validate(descriptor, body, now))
            .collect();
        if !problems.is_empty() {
            return Err(PosError::Validation(problems));
        }
        let updated = upsert
            .iter()
            .filter(|body| body.get(ID).is_some_and(|value| !value.is_null()))
            .map(|body| body_id(kind, body))
            .collect::<Result<Vec<_>>>()?;
        for &id in delete.iter().chain(&updated) {
            if self.repository.fetch::<R>(id).await?.is_none() {
                return Err(PosError::NotFound {
                    resource: kind.label(),
                    id,
                });
            }
        }

        for &id in delete {
            self.try_delete::<R>(id, progress).await?;
        }
        let mut saved = Vec::with_capacity(upsert.len());
        for body in upsert {
            let envelope = if body.get(ID).is_some_and(|value| !value.is_null()) {
                self.try_update::<R>(body, progress).await?
            } else {
                self.try_add::<R>(body, progress).await?
            };
            saved.extend(envelope.data);
        }
        Ok(Envelope::success(kind.key(), SAVED, saved))
    }
}
