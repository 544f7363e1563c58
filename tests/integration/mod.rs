//! Integration tests against a mock HTTP server and a scripted transport

pub mod mock_server;
pub mod scripted;

pub mod charges;
pub mod error_handling;
pub mod pagination;
pub mod subscriptions;
