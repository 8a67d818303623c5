pub mod brief;
pub mod execution_log;
pub mod matching;
pub mod notification;
pub mod proposal;
