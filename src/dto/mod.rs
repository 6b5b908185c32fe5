pub mod event_dto;
pub mod interview_dto;
pub mod mentorship_dto;
pub mod resume_dto;
