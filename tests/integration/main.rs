//! Black-box integration tests for the ChatRelay server.

mod helpers;

mod health_test;
mod ws_test;
