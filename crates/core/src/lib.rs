//! Domain rules for the brief / proposal engagement workflow.
//!
//! Everything in this crate is pure: status machines, field validation,
//! the matching score policy, notification copy and the error taxonomy.
//! Persistence lives in `brieflink-db`; orchestration in `brieflink-workflow`.

pub mod brief;
pub mod error;
pub mod execution_log;
pub mod matching;
pub mod notification;
pub mod pagination;
pub mod proposal;
pub mod roles;
pub mod status;
pub mod types;
