use crate::domain::record::{RecordId, ResourceKind};
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, BufReader, Read};

/// One line of the request stream, tagged by its `op` field.
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    Add {
        resource: ResourceKind,
        body: Value,
    },
    Get {
        resource: ResourceKind,
        id: RecordId,
    },
    List {
        resource: ResourceKind,
        #[serde(default)]
        by: Option<String>,
        #[serde(default)]
        id: Option<RecordId>,
    },
    Update {
        resource: ResourceKind,
        body: Value,
    },
    Delete {
        resource: ResourceKind,
        id: RecordId,
    },
    Close {
        resource: ResourceKind,
        id: RecordId,
    },
    /// Deletes `delete`, then adds or updates each body in `upsert`.
    Batch {
        resource: ResourceKind,
        #[serde(default)]
        delete: Vec<RecordId>,
        #[serde(default)]
        upsert: Vec<Value>,
    },
}

impl Request {
    pub fn resource(&self) -> ResourceKind {
        match self {
            Self::Add { resource, .. }
            | Self::Get { resource, .. }
            | Self::List { resource, .. }
            | Self::Update { resource, .. }
            | Self::Delete { resource, .. }
            | Self::Close { resource, .. }
            | Self::Batch { resource, .. } => *resource,
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Get { .. } => "get",
            Self::List { .. } => "list",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Close { .. } => "close",
            Self::Batch { .. } => "batch",
        }
    }
}

/// Reads requests from a JSON-lines source.
///
/// Blank lines are skipped. Each remaining line is decoded on its own, so a
/// malformed line yields an error item without ending the stream.
pub struct RequestReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Lazily reads and decodes requests, one per line.
    pub fn requests(self) -> impl Iterator<Item = Result<Request>> {
        self.reader
            .lines()
            .filter(|line| !matches!(line, Ok(text) if text.trim().is_empty()))
            .map(|line| Ok(serde_json::from_str(&line?)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reader_valid_stream() {
        let data = r#"{"op":"add","resource":"company","body":{"name":"Acme"}}

{"op":"list","resource":"expenses","by":"companyId","id":1}
{"op":"close","resource":"transaction","id":4}"#;
        let results: Vec<Result<Request>> = RequestReader::new(data.as_bytes()).requests().collect();

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().unwrap(),
            &Request::Add {
                resource: ResourceKind::Company,
                body: json!({"name": "Acme"}),
            }
        );
        let list = results[1].as_ref().unwrap();
        assert_eq!(list.resource(), ResourceKind::Expenses);
        assert_eq!(list.operation(), "list");
        assert_eq!(results[2].as_ref().unwrap().operation(), "close");
    }

    #[test]
    fn test_list_scope_is_optional() {
        let data = r#"{"op":"list","resource":"branch"}"#;
        let request = RequestReader::new(data.as_bytes())
            .requests()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(
            request,
            Request::List {
                resource: ResourceKind::Branch,
                by: None,
                id: None,
            }
        );
    }

    #[test]
    fn test_batch_lists_default_to_empty() {
        let data = r#"{"op":"batch","resource":"itemPromotion","delete":[3]}"#;
        let request = RequestReader::new(data.as_bytes())
            .requests()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(
            request,
            Request::Batch {
                resource: ResourceKind::ItemPromotion,
                delete: vec![3],
                upsert: Vec::new(),
            }
        );
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "{\"op\":\"fly\",\"resource\":\"branch\"}\nnot json\n{\"op\":\"get\",\"resource\":\"unit\",\"id\":2}";
        let results: Vec<Result<Request>> = RequestReader::new(data.as_bytes()).requests().collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}
