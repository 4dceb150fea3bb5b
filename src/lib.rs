pub mod common;
pub mod config;
pub mod hub;
pub mod ingest;
pub mod server;
pub mod station;
pub mod storage;
pub mod transport;
pub mod ws;
