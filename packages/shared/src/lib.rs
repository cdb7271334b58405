//! Shared utilities for Agora server and client.

pub mod logger;
pub mod time;
