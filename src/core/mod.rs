//! Core translation types and the service client

pub mod client;
pub mod config;
pub mod errors;
pub mod file_types;
pub mod mock;
pub mod models;
