//! Acceptance tests for the uptime node.
//!
//! These tests drive the full HTTP stack against a scripted tick timer:
//! - Tick accumulation across timer wraparound, including the known drift
//! - Wall-clock fallback mode
//! - Accept negotiation, cache hints and buffer bounds

mod acceptance;
