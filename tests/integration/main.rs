//! End-to-end tests driving the HTTP router over in-memory stores.

mod helpers;

mod account_test;
mod token_flow_test;
