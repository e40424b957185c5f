//! Static file server for the working directory with caching disabled.
//!
//! Every response carries `Cache-Control: no-store, no-cache, must-revalidate`,
//! `Pragma: no-cache` and `Expires: 0`, whatever its status.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
