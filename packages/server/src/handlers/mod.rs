pub mod company;
pub mod health;
pub mod job;
pub mod user;
pub mod webhook;
