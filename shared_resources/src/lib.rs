pub mod config;
pub mod direction;
pub mod event;
pub mod fault;
pub mod handoff_buffer;
pub mod request;
