//! Row structs (`FromRow`) and insert/update DTOs, one module per table.

pub mod brief;
pub mod engagement_match;
pub mod execution_log;
pub mod notification;
pub mod profile;
pub mod proposal;
