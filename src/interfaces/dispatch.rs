use super::jsonl::request_reader::Request;
use super::jsonl::response_writer::Response;
use crate::application::envelope::Envelope;
use crate::application::pool::ConnectionPool;
use crate::application::transactions::TransactionService;
use crate::application::workflow::CrudWorkflow;
use crate::domain::clock::Clock;
use crate::domain::record::{RecordId, ResourceKind};
use crate::domain::resources::{
    Branch, Company, Employee, Expenses, ItemExpenses, ItemPromotion, Position, Product,
    ProductType, Promotion, Resource, Table, Unit,
};
use crate::domain::validation::Problem;
use crate::error::{PosError, Result};
use std::sync::Arc;
use tracing::warn;

/// Routes decoded requests to the workflow of their resource.
///
/// Every resource goes through [`CrudWorkflow`] except transactions, which
/// have their own table-service operations. Only envelope serialization can
/// fail here; every business outcome, rejections included, is a `Response`.
#[derive(Clone)]
pub struct Dispatcher {
    crud: CrudWorkflow,
    transactions: TransactionService,
}

fn rejected(kind: ResourceKind, error: PosError) -> Result<Response> {
    warn!(resource = %kind, %error, "request rejected");
    Response::new(Envelope::<()>::rejected(kind.key(), &error))
}

fn unsupported(kind: ResourceKind, operation: &str) -> PosError {
    PosError::Unsupported {
        resource: kind.label(),
        operation: operation.to_string(),
    }
}

/// A `list` scope needs both the field name and its value.
fn scope(by: Option<&str>, id: Option<RecordId>) -> Result<Option<(&str, RecordId)>> {
    match (by, id) {
        (None, _) => Ok(None),
        (Some(field), Some(id)) => Ok(Some((field, id))),
        (Some(field), None) => Err(PosError::Validation(vec![Problem::missing(&format!(
            "id ({field})"
        ))])),
    }
}

impl Dispatcher {
    pub fn new(pool: ConnectionPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            crud: CrudWorkflow::new(pool.clone(), Arc::clone(&clock)),
            transactions: TransactionService::new(pool, clock),
        }
    }

    pub async fn dispatch(&self, request: Request) -> Result<Response> {
        match request.resource() {
            ResourceKind::Company => self.handle::<Company>(request).await,
            ResourceKind::Branch => self.handle::<Branch>(request).await,
            ResourceKind::Position => self.handle::<Position>(request).await,
            ResourceKind::Employee => self.handle::<Employee>(request).await,
            ResourceKind::Unit => self.handle::<Unit>(request).await,
            ResourceKind::ProductType => self.handle::<ProductType>(request).await,
            ResourceKind::Product => self.handle::<Product>(request).await,
            ResourceKind::Promotion => self.handle::<Promotion>(request).await,
            ResourceKind::ItemPromotion => self.handle::<ItemPromotion>(request).await,
            ResourceKind::Table => self.handle::<Table>(request).await,
            ResourceKind::Expenses => self.handle::<Expenses>(request).await,
            ResourceKind::ItemExpenses => self.handle::<ItemExpenses>(request).await,
            ResourceKind::Transaction => self.handle_transaction(request).await,
        }
    }

    async fn handle<R: Resource>(&self, request: Request) -> Result<Response> {
        let kind = R::DESCRIPTOR.kind;
        match request {
            Request::Add { body, .. } => Response::new(self.crud.add::<R>(&body).await),
            Request::Get { id, .. } => Response::new(self.crud.get::<R>(id).await),
            Request::List { by, id, .. } => match scope(by.as_deref(), id) {
                Ok(by) => Response::new(self.crud.list::<R>(by).await),
                Err(error) => rejected(kind, error),
            },
            Request::Update { body, .. } => Response::new(self.crud.update::<R>(&body).await),
            Request::Delete { id, .. } => Response::new(self.crud.delete::<R>(id).await),
            Request::Batch { delete, upsert, .. } => {
                Response::new(self.crud.batch::<R>(&delete, &upsert).await)
            }
            Request::Close { .. } => rejected(kind, unsupported(kind, "close")),
        }
    }

    async fn handle_transaction(&self, request: Request) -> Result<Response> {
        let kind = ResourceKind::Transaction;
        match request {
            Request::Add { body, .. } => Response::new(self.transactions.open(&body).await),
            Request::Get { id, .. } => Response::new(self.transactions.get_by_table(id).await),
            Request::List { by, id, .. } => match scope(by.as_deref(), id) {
                Ok(by) => Response::new(self.transactions.list(by).await),
                Err(error) => rejected(kind, error),
            },
            Request::Close { id, .. } => Response::new(self.transactions.close(id).await),
            other @ (Request::Update { .. } | Request::Delete { .. } | Request::Batch { .. }) => {
                rejected(kind, unsupported(kind, other.operation()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::infrastructure::in_memory::InMemoryRecordStore;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        let pool = ConnectionPool::new(Box::new(InMemoryRecordStore::new()), 2);
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        Dispatcher::new(pool, Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_resource() {
        let dispatcher = dispatcher();
        let add = Request::Add {
            resource: ResourceKind::Company,
            body: json!({
                "name": "Acme",
                "address": "1 Market Rd",
                "tax": "1234567890123",
                "phone": "0123456789",
                "email": "owner@example.com",
                "status": "Active"
            }),
        };
        let response = dispatcher.dispatch(add).await.unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.response["company"]["id"], json!(1));

        let unit = Request::Add {
            resource: ResourceKind::Unit,
            body: json!({"name": "plate", "companyId": 1, "status": "Active"}),
        };
        let response = dispatcher.dispatch(unit).await.unwrap();
        assert_eq!(response.response["unit"]["companyId"], json!(1));
    }

    #[tokio::test]
    async fn test_unsupported_operations() {
        let dispatcher = dispatcher();

        let close = Request::Close {
            resource: ResourceKind::Branch,
            id: 1,
        };
        let response = dispatcher.dispatch(close).await.unwrap();
        assert_eq!(response.code, 400);
        assert_eq!(
            response.response["message"],
            json!("Operation `close` is not supported for branch.")
        );

        let delete = Request::Delete {
            resource: ResourceKind::Transaction,
            id: 1,
        };
        assert_eq!(dispatcher.dispatch(delete).await.unwrap().code, 400);

        let batch = Request::Batch {
            resource: ResourceKind::Transaction,
            delete: vec![1],
            upsert: Vec::new(),
        };
        assert_eq!(dispatcher.dispatch(batch).await.unwrap().code, 400);
    }

    #[tokio::test]
    async fn test_scoped_list_requires_value() {
        let dispatcher = dispatcher();
        let list = Request::List {
            resource: ResourceKind::Expenses,
            by: Some("companyId".to_string()),
            id: None,
        };

        let response = dispatcher.dispatch(list).await.unwrap();
        assert_eq!(response.code, 400);
        assert_eq!(response.response["problems"][0]["kind"], json!("MissingField"));
    }
}
