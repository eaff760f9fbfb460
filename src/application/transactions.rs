use super::checker::ensure_references;
use super::envelope::Envelope;
use super::pool::ConnectionPool;
use super::repository::Repository;
use super::workflow::{
    Progress, SAVED, Stage, found_message, not_found_message, respond, validated,
};
use crate::domain::clock::Clock;
use crate::domain::filter::Filter;
use crate::domain::record::{Document, RecordId, ResourceKind, Status};
use crate::domain::resources::{Branch, Resource, Table};
use crate::domain::transaction::{
    OpenRequest, TableOverview, Transaction, month_start, running_number,
};
use crate::domain::validation::Problem;
use crate::error::{PosError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use futures::future::try_join_all;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

const KEY: &str = "transaction";

/// Table service: seating guests, looking up what runs on each table and
/// closing sittings.
#[derive(Clone)]
pub struct TransactionService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl TransactionService {
    pub fn new(pool: ConnectionPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository: Repository::new(pool),
            clock,
        }
    }

    pub async fn open(&self, body: &Value) -> Envelope<Transaction> {
        let mut progress = Progress::start(ResourceKind::Transaction, "open");
        let outcome = self.try_open(body, &mut progress).await;
        respond(progress, outcome)
    }

    /// The table with the sitting currently running on it this month.
    pub async fn get_by_table(&self, table_id: RecordId) -> Envelope<TableOverview> {
        let progress = Progress::start(ResourceKind::Transaction, "get");
        let outcome = self.try_get_by_table(table_id).await;
        respond(progress, outcome)
    }

    /// Tables of a branch, of a company, or all of them, each with its
    /// running sitting and a 1-based position.
    pub async fn list(&self, by: Option<(&str, RecordId)>) -> Envelope<Vec<TableOverview>> {
        let progress = Progress::start(ResourceKind::Transaction, "list");
        let outcome = self.try_list(by).await;
        respond(progress, outcome)
    }

    pub async fn close(&self, id: RecordId) -> Envelope<Transaction> {
        let mut progress = Progress::start(ResourceKind::Transaction, "close");
        let outcome = self.try_close(id, &mut progress).await;
        respond(progress, outcome)
    }

    async fn try_open(
        &self,
        body: &Value,
        progress: &mut Progress,
    ) -> Result<Envelope<Transaction>> {
        let now = self.clock.now();
        let descriptor = Transaction::DESCRIPTOR;

        let document = validated(descriptor, body, now)?;
        progress.advance(Stage::Validated);
        ensure_references(&self.repository, descriptor, &document).await?;
        progress.advance(Stage::ParentChecked);

        let request: OpenRequest = serde_json::from_value(Value::Object(document))?;
        let period = month_start(now);
        if self.in_progress(request.table_id, Some(period)).await?.is_some() {
            return Err(PosError::Occupied {
                table: request.table_id,
            });
        }
        progress.advance(Stage::UniquenessChecked);

        let branch = self
            .repository
            .fetch::<Branch>(request.branch_id)
            .await?
            .ok_or(PosError::ParentNotFound {
                resource: ResourceKind::Branch.label(),
                field: "branchId",
                id: request.branch_id,
            })?;
        let issued = self
            .repository
            .count(
                ResourceKind::Transaction,
                &Filter::all()
                    .eq("branchId", request.branch_id)
                    .since("startOrder", period),
            )
            .await?;
        let receipt = running_number(&branch.code_receipt, issued);

        let end_order = TimeDelta::try_minutes(request.expiration)
            .and_then(|length| now.checked_add_signed(length))
            .ok_or_else(|| {
                PosError::Validation(vec![Problem::invalid(
                    "expiration",
                    "expiration is out of range",
                )])
            })?;

        let document: Document = serde_json::from_value(json!({
            "tableId": request.table_id,
            "receipt": receipt,
            "startOrder": now.to_rfc3339(),
            "endOrder": end_order.to_rfc3339(),
            "peoples": request.peoples,
            "totalPrice": "0",
            "branchId": request.branch_id,
            "employeeId": request.employee_id,
            "status": Status::Active.as_str(),
        }))?;
        let transaction: Transaction = self.repository.insert(document, now).await?;
        progress.advance(Stage::Mutated);
        info!(
            id = transaction.id,
            table = transaction.table_id,
            receipt = %transaction.receipt,
            "table opened"
        );
        Ok(Envelope::success(KEY, SAVED, transaction))
    }

    async fn try_get_by_table(&self, table_id: RecordId) -> Result<Envelope<TableOverview>> {
        let table = self
            .repository
            .fetch::<Table>(table_id)
            .await?
            .ok_or(PosError::NotFound {
                resource: ResourceKind::Table.label(),
                id: table_id,
            })?;
        let order = self
            .in_progress(table_id, Some(month_start(self.clock.now())))
            .await?;
        Ok(Envelope::success(
            KEY,
            found_message(ResourceKind::Transaction),
            TableOverview::new(table, order),
        ))
    }

    async fn try_list(&self, by: Option<(&str, RecordId)>) -> Result<Envelope<Vec<TableOverview>>> {
        let filter = match by {
            None => Filter::all(),
            Some((field @ ("branchId" | "companyId"), id)) => Filter::all().eq(field, id),
            Some((field, _)) => {
                return Err(PosError::Unsupported {
                    resource: ResourceKind::Transaction.label(),
                    operation: format!("list by {field}"),
                });
            }
        };

        let tables = self.repository.fetch_many::<Table>(&filter).await?;
        if tables.is_empty() {
            debug!(?by, "no tables");
            return Ok(Envelope::empty(
                KEY,
                not_found_message(ResourceKind::Table, by),
            ));
        }

        // The unscoped listing shows every running sitting, whatever its month.
        let since = by.map(|_| month_start(self.clock.now()));
        let overviews = try_join_all(tables.into_iter().enumerate().map(|(position, table)| {
            async move {
                let order = self.in_progress(table.id, since).await?;
                Ok::<_, PosError>(TableOverview::new(table, order).with_index(position + 1))
            }
        }))
        .await?;

        Ok(Envelope::success(
            KEY,
            found_message(ResourceKind::Transaction),
            overviews,
        ))
    }

    async fn try_close(
        &self,
        id: RecordId,
        progress: &mut Progress,
    ) -> Result<Envelope<Transaction>> {
        let not_found = || PosError::NotFound {
            resource: ResourceKind::Transaction.label(),
            id,
        };
        if self.repository.fetch::<Transaction>(id).await?.is_none() {
            return Err(not_found());
        }

        let mut patch = Document::new();
        patch.insert("status".to_string(), json!(Status::InActive.as_str()));
        let closed = self
            .repository
            .update::<Transaction>(id, patch)
            .await?
            .ok_or_else(not_found)?;
        progress.advance(Stage::Mutated);
        info!(id, table = closed.table_id, "table closed");
        Ok(Envelope::success(KEY, "Transaction closed.", closed))
    }

    /// Latest active sitting on the table, optionally limited to sittings
    /// started at or after `since`.
    async fn in_progress(
        &self,
        table_id: RecordId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Option<Transaction>> {
        let mut filter = Filter::all()
            .eq("tableId", table_id)
            .eq("status", Status::Active.as_str());
        if let Some(since) = since {
            filter = filter.since("startOrder", since);
        }
        Ok(self
            .repository
            .fetch_many::<Transaction>(&filter)
            .await?
            .pop())
    }
}
