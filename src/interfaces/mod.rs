//! Outer surface: JSON-lines request/response streams and the dispatcher
//! routing each request to its workflow.

pub mod dispatch;
pub mod jsonl;
