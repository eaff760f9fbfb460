//! Domain layer: records, their descriptors, validation rules and the
//! persistence port. Nothing in here performs I/O.

pub mod clock;
pub mod descriptor;
pub mod filter;
pub mod ports;
pub mod record;
pub mod resources;
pub mod transaction;
pub mod validation;
