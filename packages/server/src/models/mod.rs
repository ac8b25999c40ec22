pub mod application;
pub mod company;
pub mod job;
pub mod shared;
pub mod user;
pub mod webhook;
