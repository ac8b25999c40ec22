mod application;
mod job;
mod webhook;
