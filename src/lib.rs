//! Sigscope — a sinusoid signal service and its windowed sweep client.

pub mod client;
pub mod config;
pub mod export;
pub mod server;
pub mod signal;
pub mod sweep;
