pub mod event_service;
pub mod interview_service;
pub mod mentorship_service;
pub mod resume_service;
