//! Integration tests against a mock HTTP server.

mod error_handling;
mod me;
mod mock_server;
mod runs;
