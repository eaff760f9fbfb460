use crate::domain::record::RecordId;
use crate::domain::validation::Problem;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosError {
    #[error("{}", summarize(.0))]
    Validation(Vec<Problem>),
    #[error("No {resource} found with {field} : {id}")]
    ParentNotFound {
        resource: &'static str,
        field: &'static str,
        id: RecordId,
    },
    #[error("Found information {field} : {value} has already been used in the system.")]
    DuplicateName { field: &'static str, value: String },
    #[error("No {resource} found with id : {id}")]
    NotFound { resource: &'static str, id: RecordId },
    #[error("Table {table} already has a transaction in progress.")]
    Occupied { table: RecordId },
    #[error("Operation `{operation}` is not supported for {resource}.")]
    Unsupported {
        resource: &'static str,
        operation: String,
    },
    #[error("An error occurred {action} data.")]
    Persistence { action: &'static str },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Connection pool closed: {0}")]
    PoolClosed(#[from] tokio::sync::AcquireError),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl PosError {
    /// HTTP-style status code reported alongside the response envelope.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Unsupported { .. } => 400,
            Self::ParentNotFound { .. } | Self::NotFound { .. } => 404,
            Self::DuplicateName { .. } | Self::Occupied { .. } => 409,
            _ => 500,
        }
    }

    pub fn problems(&self) -> &[Problem] {
        match self {
            Self::Validation(problems) => problems,
            _ => &[],
        }
    }
}

fn summarize(problems: &[Problem]) -> String {
    problems
        .iter()
        .map(|p| p.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::ProblemKind;

    #[test]
    fn test_validation_message_joins_problems() {
        let err = PosError::Validation(vec![
            Problem::new(ProblemKind::MissingField, "name", "missing field: name"),
            Problem::new(ProblemKind::MissingField, "phone", "missing field: phone"),
        ]);
        assert_eq!(err.to_string(), "missing field: name; missing field: phone");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.problems().len(), 2);
    }

    #[test]
    fn test_status_code_mapping() {
        let parent = PosError::ParentNotFound {
            resource: "company",
            field: "companyId",
            id: 7,
        };
        assert_eq!(parent.to_string(), "No company found with companyId : 7");
        assert_eq!(parent.status_code(), 404);

        let duplicate = PosError::DuplicateName {
            field: "name",
            value: "Main".to_string(),
        };
        assert_eq!(duplicate.status_code(), 409);

        let persistence = PosError::Persistence { action: "saving" };
        assert_eq!(persistence.to_string(), "An error occurred saving data.");
        assert_eq!(persistence.status_code(), 500);
        assert!(persistence.problems().is_empty());
    }
}
