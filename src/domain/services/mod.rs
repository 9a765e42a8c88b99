pub mod batch;
pub mod conflict;
pub mod recurrence;
