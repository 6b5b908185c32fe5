pub mod events;
pub mod health;
pub mod interviews;
pub mod mentorship;
pub mod resume;
