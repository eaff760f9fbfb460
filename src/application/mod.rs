//! Application layer: the request workflow shared by every resource, the
//! table-service operations and the pieces they are built from.

pub mod checker;
pub mod envelope;
pub mod pool;
pub mod repository;
pub mod transactions;
pub mod workflow;
