#![warn(missing_docs)]
//! queue-watch follows a border checkpoint's live vehicle queue, records how
//! many vehicles leave it each hour, and notifies subscribers as their
//! vehicle approaches the front.

pub mod cmd;
pub mod config;
pub mod engine;
pub mod http_client;
pub mod http_server;
pub mod models;
pub mod notification;
pub mod persistence;
pub mod providers;
pub mod supervisor;
pub mod test_helpers;
