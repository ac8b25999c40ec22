pub mod company;
pub mod job;
pub mod job_application;
pub mod user;
