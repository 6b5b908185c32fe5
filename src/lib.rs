pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    event_service::EventService, interview_service::InterviewService,
    mentorship_service::MentorshipService, resume_service::ResumeService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub interview_service: InterviewService,
    pub event_service: EventService,
    pub mentorship_service: MentorshipService,
    pub resume_service: ResumeService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let interview_service = InterviewService::new(pool.clone());
        let event_service = EventService::new(pool.clone());
        let mentorship_service = MentorshipService::new(pool.clone());
        let resume_service = ResumeService::new(pool.clone());

        Self {
            pool,
            interview_service,
            event_service,
            mentorship_service,
            resume_service,
        }
    }
}
