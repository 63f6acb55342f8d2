// Integration test root for http_server tests.
// Submodules live under `tests/http_server/` directory.

#[path = "http_server/helpers.rs"]
mod helpers;

#[path = "http_server/health.rs"]
mod health;

#[path = "http_server/status.rs"]
mod status;

#[path = "http_server/queue.rs"]
mod queue;

#[path = "http_server/watches.rs"]
mod watches;

#[path = "http_server/statistics.rs"]
mod statistics;
