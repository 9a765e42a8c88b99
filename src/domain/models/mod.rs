pub mod recurrence;
pub mod reservation;
