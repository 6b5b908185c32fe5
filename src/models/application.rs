/// Application status the scheduling workflow transitions into. Other
/// statuses are owned by the applications route group and pass through
/// untouched.
pub const STATUS_INTERVIEW: &str = "Interview";
