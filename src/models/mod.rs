pub mod application;
pub mod event;
pub mod interview;
pub mod mentorship;
pub mod resume;
pub mod user;
