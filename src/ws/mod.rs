pub mod handler;
pub mod messages;
