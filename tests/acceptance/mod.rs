//! End-to-end tests for the uptime resource.

mod common;
mod negotiation_test;
mod uptime_test;
